//! Sizing Advisor
//!
//! Prices cloud services across hyperscalers, EU providers and sovereign
//! variants, and turns free-text application requests ("Gitlab klein") into
//! a sized, priced workload. Results are printed as JSON on stdout; logs go
//! to stderr.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_pricing::{ServiceRequest, StorageClass, WorkloadConfig};
use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::{debug, info};

mod advisor;
mod config;

use advisor::Advisor;
use config::AdvisorConfig;

#[derive(Parser, Debug)]
#[command(name = "sizing-advisor")]
#[command(about = "Estimate monthly cloud cost and size known applications from a description")]
struct Cli {
    /// Provider id (aws, hetzner, azure-sovereign, ...). Defaults to ADVISOR_DEFAULT_PROVIDER.
    #[arg(short, long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Service(Service),

    /// Price one service on every catalog provider, cheapest first
    Compare {
        #[command(subcommand)]
        service: Service,
    },

    /// Price the standard workload on `--provider`, or on every provider
    Workload {
        /// JSON file overriding parts of the standard workload
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Match a description against the known applications
    Match {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Detect the requested size from a description
    Sizing {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Match, size and price a description in one go
    Advise {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Providers to price on. Defaults to `--provider`, else every catalog provider.
        #[arg(long, value_delimiter = ',')]
        providers: Vec<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum Service {
    /// Price a virtual machine
    Compute {
        #[arg(long)]
        vcpu: f64,
        #[arg(long)]
        ram_gb: f64,
        /// Restrict to SAP certified sizes
        #[arg(long)]
        sap: bool,
    },

    /// Price a managed database
    Database {
        /// Free-form engine name ("PostgreSQL 16", "MariaDB", ...)
        #[arg(long, default_value = "postgresql")]
        engine: String,
        #[arg(long)]
        size_gb: f64,
        #[arg(long)]
        multi_az: bool,
    },

    /// Price object, block or file storage
    Storage {
        /// object, block or file
        #[arg(long, default_value = "object")]
        class: StorageClass,
        #[arg(long)]
        size_gb: f64,
        #[arg(long, default_value = "standard")]
        tier: String,
    },

    /// Price a managed Kubernetes cluster
    Kubernetes {
        #[arg(long)]
        nodes: u32,
        #[arg(long, default_value_t = domain_pricing::estimate::DEFAULT_NODE_VCPU)]
        node_vcpu: f64,
        #[arg(long, default_value_t = domain_pricing::estimate::DEFAULT_NODE_RAM)]
        node_ram: f64,
    },

    /// Price monitoring and logging
    Observability {
        #[arg(long, default_value_t = 10.0)]
        metrics: f64,
        #[arg(long, default_value_t = 5.0)]
        alarms: f64,
        #[arg(long, default_value_t = 10.0)]
        logs_gb: f64,
        #[arg(long, default_value_t = 10.0)]
        retention_gb: f64,
    },
}

impl From<Service> for ServiceRequest {
    fn from(service: Service) -> Self {
        match service {
            Service::Compute { vcpu, ram_gb, sap } => ServiceRequest::Compute {
                vcpu,
                ram_gb,
                sap_required: sap,
            },
            Service::Database {
                engine,
                size_gb,
                multi_az,
            } => ServiceRequest::Database {
                engine,
                size_gb,
                multi_az,
            },
            Service::Storage {
                class,
                size_gb,
                tier,
            } => ServiceRequest::Storage {
                class,
                size_gb,
                tier,
            },
            Service::Kubernetes {
                nodes,
                node_vcpu,
                node_ram,
            } => ServiceRequest::Kubernetes {
                node_count: nodes,
                node_vcpu,
                node_ram,
            },
            Service::Observability {
                metrics,
                alarms,
                logs_gb,
                retention_gb,
            } => ServiceRequest::Observability {
                metrics,
                alarms,
                logs_gb,
                retention_gb,
            },
        }
    }
}

fn main() -> Result<()> {
    install_color_eyre();

    let config = AdvisorConfig::from_env()?;
    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();
    debug!(command = ?cli.command, "Parsed command line");

    let advisor = Advisor::from_config(&config)?;
    let provider = cli.provider.map(|p| p.trim().to_lowercase());

    run(&advisor, provider.as_deref(), &config.default_provider, cli.command)
}

/// `provider` is the explicit `--provider`. Single-service commands fall back
/// to `default_provider`; workload and advise price on every provider instead.
fn run(
    advisor: &Advisor,
    provider: Option<&str>,
    default_provider: &str,
    command: Commands,
) -> Result<()> {
    let estimator = advisor.estimator();

    match command {
        Commands::Service(service) => {
            let provider = provider.unwrap_or(default_provider);
            estimator.catalog().require_provider(provider)?;
            info!(provider, "Pricing single service");

            // Kubernetes gets its node and fee breakdown, not just the total
            match ServiceRequest::from(service) {
                ServiceRequest::Kubernetes {
                    node_count,
                    node_vcpu,
                    node_ram,
                } => print_json(&estimator.kubernetes_cost(provider, node_count, node_vcpu, node_ram)),
                request => print_json(&estimator.quote(provider, &request)),
            }
        }

        Commands::Compare { service } => {
            let quotes = estimator.compare_provider_prices(&ServiceRequest::from(service));
            info!(providers = quotes.len(), "Compared providers");
            print_json(&quotes)
        }

        Commands::Workload { config } => {
            let workload = match config {
                Some(path) => read_workload(&path)?,
                None => WorkloadConfig::default(),
            };
            match provider {
                Some(provider) => {
                    estimator.catalog().require_provider(provider)?;
                    print_json(&estimator.standard_workload(provider, &workload))
                }
                None => print_json(&estimator.compare_standard_workload(&workload)),
            }
        }

        Commands::Match { text } => print_json(&advisor.matcher().match_application(&text.join(" "))),

        Commands::Sizing { text } => print_json(&advisor.sizing().detect_sizing(&text.join(" "))),

        Commands::Advise { text, providers } => {
            let mut providers: Vec<String> = providers.iter().map(|p| p.trim().to_lowercase()).collect();
            if providers.is_empty() {
                providers.extend(provider.map(str::to_string));
            }
            for id in &providers {
                estimator.catalog().require_provider(id)?;
            }
            print_json(&advisor.advise(&text.join(" "), &providers))
        }
    }
}

fn read_workload(path: &Path) -> Result<WorkloadConfig> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read workload config {}", path.display()))?;
    serde_json::from_str(&json)
        .wrap_err_with(|| format!("Invalid workload config {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compute_with_global_provider() {
        let cli = Cli::try_parse_from([
            "sizing-advisor",
            "compute",
            "--vcpu",
            "4",
            "--ram-gb",
            "16",
            "-p",
            "aws-sovereign",
        ])
        .unwrap();

        assert_eq!(cli.provider.as_deref(), Some("aws-sovereign"));
        let Commands::Service(service) = cli.command else {
            panic!("expected a service command");
        };
        assert_eq!(
            ServiceRequest::from(service),
            ServiceRequest::Compute {
                vcpu: 4.0,
                ram_gb: 16.0,
                sap_required: false
            }
        );
    }

    #[test]
    fn test_parse_compare_storage() {
        let cli = Cli::try_parse_from([
            "sizing-advisor",
            "compare",
            "storage",
            "--class",
            "block",
            "--size-gb",
            "100",
            "--tier",
            "ssd",
        ])
        .unwrap();

        let Commands::Compare { service } = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(
            ServiceRequest::from(service),
            ServiceRequest::Storage {
                class: StorageClass::Block,
                size_gb: 100.0,
                tier: "ssd".to_string()
            }
        );
    }

    #[test]
    fn test_parse_kubernetes_defaults() {
        let cli = Cli::try_parse_from(["sizing-advisor", "kubernetes", "--nodes", "3"]).unwrap();
        let Commands::Service(service) = cli.command else {
            panic!("expected a service command");
        };
        assert_eq!(
            ServiceRequest::from(service),
            ServiceRequest::Kubernetes {
                node_count: 3,
                node_vcpu: 4.0,
                node_ram: 16.0
            }
        );
    }

    #[test]
    fn test_parse_advise_text_and_providers() {
        let cli = Cli::try_parse_from([
            "sizing-advisor",
            "advise",
            "Gitlab",
            "klein",
            "--providers",
            "hetzner,aws",
        ])
        .unwrap();

        let Commands::Advise { text, providers } = cli.command else {
            panic!("expected advise");
        };
        assert_eq!(text.join(" "), "Gitlab klein");
        assert_eq!(providers, vec!["hetzner", "aws"]);
    }

    #[test]
    fn test_match_requires_text() {
        assert!(Cli::try_parse_from(["sizing-advisor", "match"]).is_err());
    }

    #[test]
    fn test_run_rejects_unknown_provider() {
        let advisor = Advisor::builtin().unwrap();
        let command = Commands::Service(Service::Compute {
            vcpu: 2.0,
            ram_gb: 8.0,
            sap: false,
        });
        let err = run(&advisor, Some("nimbus"), "aws", command).unwrap_err();
        assert!(err.to_string().contains("nimbus"));
    }

    #[test]
    fn test_run_service_falls_back_to_default_provider() {
        let advisor = Advisor::builtin().unwrap();
        let compute = || {
            Commands::Service(Service::Compute {
                vcpu: 2.0,
                ram_gb: 8.0,
                sap: false,
            })
        };
        assert!(run(&advisor, None, "hetzner", compute()).is_ok());
        assert!(run(&advisor, None, "nimbus", compute()).is_err());
        assert!(run(&advisor, Some("hetzner"), "nimbus", compute()).is_ok());
    }

    #[test]
    fn test_run_advise_rejects_unknown_provider() {
        let advisor = Advisor::builtin().unwrap();
        let command = Commands::Advise {
            text: vec!["gitlab".to_string()],
            providers: vec!["AWS".to_string(), "nimbus".to_string()],
        };
        assert!(run(&advisor, None, "aws", command).is_err());
    }

    #[test]
    fn test_run_workload_reads_config_file() {
        let path = std::env::temp_dir().join("sizing-advisor-workload-test.json");
        std::fs::write(&path, r#"{"vcpu": 4, "ram_gb": 16}"#).unwrap();

        let workload = read_workload(&path).unwrap();
        assert_eq!(workload.vcpu, 4.0);
        assert_eq!(workload.database_size_gb, 100.0);

        std::fs::remove_file(&path).unwrap();
    }
}
