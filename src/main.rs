mod app;
mod config;
mod deploy;
mod game;
mod library;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1).peekable();
    let mut apply_name: Option<String> = None;
    let mut list_only = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--apply" | "-a" => {
                if let Some(name) = args.next() {
                    apply_name = Some(name);
                } else {
                    eprintln!("--apply requires a mod name");
                }
            }
            "--list" | "-l" => list_only = true,
            "--help" | "-h" => {
                println!("pakswap");
                println!("  --list            List available mods without the TUI");
                println!("  --apply <name>    Apply a mod by folder name without the TUI");
                return Ok(());
            }
            _ => {}
        }
    }

    if list_only {
        let app = app::App::initialize()?;
        if app.mods.is_empty() {
            println!("No mods found in {}", app.paths.mods_root.display());
        } else {
            for descriptor in &app.mods {
                println!("{}", descriptor.display_line());
            }
        }
        return Ok(());
    }

    if let Some(name) = apply_name {
        let mut app = app::App::initialize()?;
        let message = app.apply_mod_blocking(&name)?;
        println!("{message}");
        return Ok(());
    }

    let mut app = app::App::initialize()?;
    ui::run(&mut app)
}
