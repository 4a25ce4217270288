use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use portal_guard::config::{load_config, GuardConfig};
use portal_guard::redirect::RedirectTarget;
use portal_guard::{AccessDecisionEngine, RoutePolicy, Session, Subdomain, SubdomainResolver, UserIdentity};

#[derive(Parser)]
#[command(name = "guard-cli")]
#[command(about = "Evaluate portal route guard decisions offline", long_about = None)]
struct Cli {
    /// Guard configuration file. Built-in defaults when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether a viewer may see a route
    Decide {
        #[arg(long)]
        host: String,
        #[arg(long)]
        path: String,
        /// Role claim of the viewer. Anonymous when omitted.
        #[arg(long)]
        role: Option<String>,
        #[arg(long, default_value = "cli-user")]
        user_id: String,
    },
    /// Build the URL of a path on another tenant's subdomain
    Link {
        /// Current host or origin (`https://` assumed without a scheme)
        #[arg(long)]
        host: String,
        /// Target tenant (www, patient, doctor, admin, laboratory)
        #[arg(long)]
        subdomain: String,
        #[arg(long, default_value = "/")]
        path: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };
    let resolver = SubdomainResolver::from_config(&config.tenant);

    match cli.command {
        Commands::Decide {
            host,
            path,
            role,
            user_id,
        } => {
            let session = match role {
                Some(role) => Session::authenticated(UserIdentity::with_raw_role(
                    user_id.clone(),
                    user_id,
                    role,
                )),
                None => Session::anonymous(),
            };
            let engine = AccessDecisionEngine::new(RoutePolicy::from_config(&config.policy).into());
            let subdomain = resolver.current_subdomain(&host);
            let decision = engine.decide(&session, &path, subdomain);
            let redirect = RedirectTarget::from_decision(&decision, engine.policy())
                .map(|target| resolver.create_internal_link(&host, &target.path));

            let output = json!({
                "host": host,
                "path": path,
                "subdomain": subdomain,
                "decision": decision,
                "redirect": redirect,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Link {
            host,
            subdomain,
            path,
        } => {
            let target = Subdomain::from_label(&subdomain);
            if target == Subdomain::Unknown {
                eprintln!("Error: unknown subdomain '{}'", subdomain);
                std::process::exit(2);
            }
            let origin = if host.contains("://") {
                host
            } else {
                format!("https://{host}")
            };
            println!("{}", resolver.build_subdomain_url(&origin, target, &path));
        }
    }

    Ok(())
}
