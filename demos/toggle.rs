//! Walk a bridge's area tree and toggle its first switched zone.
//!
//! Usage: toggle <host> <login-id> <password>

use lutron_leap::{Area, Child, Session, SwitchedZone, Zone};

fn print_tree(area: &Area, indent: usize) {
    println!("{:indent$}{} ({})", "", area.name(), area.href());
    for child in area.children() {
        match child {
            Child::Area(child_area) => print_tree(child_area, indent + 2),
            Child::Zone(zone) => println!(
                "{:indent$}{} ({}) [{}]",
                "",
                zone.name(),
                zone.href(),
                zone.control_type(),
                indent = indent + 2
            ),
        }
    }
}

fn first_switched<'a, 'b>(area: &'b Area<'a>) -> Option<&'b SwitchedZone<'a>> {
    for child in area.children() {
        match child {
            Child::Zone(Zone::Switched(zone)) => return Some(zone),
            Child::Area(child_area) => {
                if let Some(zone) = first_switched(child_area) {
                    return Some(zone);
                }
            }
            Child::Zone(_) => {}
        }
    }
    None
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (host, id, password) = match (args.next(), args.next(), args.next()) {
        (Some(host), Some(id), Some(password)) => (host, id, password),
        _ => {
            eprintln!("usage: toggle <host> <login-id> <password>");
            std::process::exit(2);
        }
    };

    let session = Session::connect_to(host)?;
    let login = session.login(&id, &password)?;
    println!("login response: {}", serde_json::to_string(&login)?);

    let root = session.root()?;
    print_tree(&root, 0);

    match first_switched(&root) {
        Some(zone) => {
            let was = zone.state()?;
            zone.set_state(!was)?;
            println!("{}: {} -> {}", zone.name(), was, !was);
        }
        None => println!("no switched zones found"),
    }

    Ok(())
}
