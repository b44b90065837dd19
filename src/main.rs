//! Minimal CLI around the scheme registry. Commands stay small and auditable
//! so operators can see exactly how encoded passwords are produced.

use std::env;

use pss_rs::config::load_config;
use pss_rs::SchemeRegistry;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Commands:\n  encrypt <plaintext> [scheme]\n  verify <plaintext> <envelope>\n  schemes\n  load-config <path>");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let registry = SchemeRegistry::with_default_schemes();

    match args[1].as_str() {
        "encrypt" => {
            if args.len() != 3 && args.len() != 4 {
                return print_usage();
            }
            if args.len() == 4 {
                if let Err(err) = registry.set_default_scheme(&args[3]) {
                    return eprintln!("scheme selection failed: {err}");
                }
            }
            match registry.encrypt(&args[2]) {
                Ok(envelope) => println!("{envelope}"),
                Err(err) => eprintln!("encryption failed: {err}"),
            }
        }
        "verify" => {
            if args.len() != 4 {
                return print_usage();
            }
            match registry.verify(&args[2], &args[3]) {
                Ok(()) => println!("match"),
                Err(err) => {
                    // Mismatch and malformed input both mean "not
                    // authenticated"; the detail goes to stderr only.
                    println!("no-match");
                    eprintln!("{err}");
                }
            }
        }
        "schemes" => {
            for name in registry.names() {
                println!("{name}");
            }
        }
        "load-config" => {
            if args.len() != 3 {
                return print_usage();
            }
            match load_config(&args[2]) {
                Ok(registry) => {
                    println!("default: {}", registry.default_scheme());
                    for name in registry.names() {
                        println!("{name}");
                    }
                }
                Err(err) => eprintln!("config load failed: {err}"),
            }
        }
        _ => print_usage(),
    }
}
