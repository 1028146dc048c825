//! VM Migration Planner CLI
//!
//! Creates migration Plans (with synthesized default mappings) and starts
//! Migrations against a Kubernetes virtualization-migration platform.

use clap::{Parser, Subcommand};
use kube::core::ObjectMeta;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vm_migration_planner::crd::{Migration, MigrationSpec, ObjectRef, PlanVm};
use vm_migration_planner::{
    ClusterClient, ClusterOps, Error, InventoryConfig, InventoryGateway, PlanCreateOptions,
    PlanProvisioner, Result,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// VM Migration Planner - provision migration plans from live inventory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Namespace to operate in
    #[arg(long, short = 'n', env = "MIGRATION_NAMESPACE", default_value = "default")]
    namespace: String,

    /// Base URL of the inventory service
    #[arg(long, env = "INVENTORY_URL")]
    inventory_url: Option<String>,

    /// Bearer token for the inventory service
    #[arg(long, env = "INVENTORY_TOKEN")]
    inventory_token: Option<String>,

    /// Skip TLS certificate verification for the inventory service
    #[arg(long, env = "INVENTORY_INSECURE")]
    inventory_insecure: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a migration plan, synthesizing default mappings as needed
    CreatePlan(CreatePlanArgs),

    /// Start execution of an existing plan
    Start {
        /// Plan name
        plan: String,
    },

    /// Print version information
    Version,
}

#[derive(Parser, Debug)]
struct CreatePlanArgs {
    /// Plan name
    name: String,

    /// Source provider name
    #[arg(long)]
    source: String,

    /// Target provider name (defaults to the first openshift provider)
    #[arg(long)]
    target: Option<String>,

    /// Comma-separated VM names to migrate
    #[arg(long, value_delimiter = ',')]
    vms: Vec<String>,

    /// Comma-separated VM ids to migrate
    #[arg(long, value_delimiter = ',')]
    vm_ids: Vec<String>,

    /// Existing network map name (synthesized when omitted)
    #[arg(long)]
    network_mapping: Option<String>,

    /// Existing storage map name (synthesized when omitted)
    #[arg(long)]
    storage_mapping: Option<String>,

    /// Map all source networks to this target ("pod" or a named attachment)
    #[arg(long)]
    default_target_network: Option<String>,

    /// Storage class for all source datastores
    #[arg(long)]
    default_target_storage_class: Option<String>,

    /// Namespace migrated VMs land in (defaults to the plan namespace)
    #[arg(long)]
    target_namespace: Option<String>,

    /// Plan description
    #[arg(long)]
    description: Option<String>,

    /// Warm migration (pre-copy while source VMs keep running)
    #[arg(long)]
    warm: bool,

    /// Use generateName for migrated PVC names
    #[arg(long)]
    pvc_name_template_use_generate_name: Option<bool>,

    /// Print the created plan as YAML
    #[arg(long, short = 'o')]
    output: Option<String>,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    match args.command {
        Command::CreatePlan(ref create) => create_plan(&args, create).await,
        Command::Start { ref plan } => start_plan(&args, plan).await,
        Command::Version => {
            println!(
                "{} {}",
                vm_migration_planner::NAME,
                vm_migration_planner::VERSION
            );
            Ok(())
        }
    }
}

async fn create_plan(args: &Args, create: &CreatePlanArgs) -> Result<()> {
    let inventory_url = args.inventory_url.clone().ok_or_else(|| {
        Error::Configuration("--inventory-url (or INVENTORY_URL) is required".into())
    })?;
    let gateway = InventoryGateway::new(InventoryConfig {
        base_url: inventory_url,
        token: args.inventory_token.clone(),
        insecure_skip_tls: args.inventory_insecure,
    })?;
    let cluster = ClusterClient::connect().await?;

    let mut vms: Vec<PlanVm> = create.vms.iter().map(|n| PlanVm::named(n.clone())).collect();
    vms.extend(create.vm_ids.iter().map(|id| PlanVm::by_id(id.clone())));
    if vms.is_empty() {
        return Err(Error::Configuration(
            "at least one of --vms or --vm-ids is required".into(),
        ));
    }

    let provisioner = PlanProvisioner::new(Arc::new(gateway), Arc::new(cluster));
    let plan = provisioner
        .create(PlanCreateOptions {
            name: create.name.clone(),
            namespace: args.namespace.clone(),
            source_provider: create.source.clone(),
            target_provider: create.target.clone(),
            vms,
            network_mapping: create.network_mapping.clone(),
            storage_mapping: create.storage_mapping.clone(),
            default_target_network: create.default_target_network.clone(),
            default_target_storage_class: create.default_target_storage_class.clone(),
            target_namespace: create.target_namespace.clone(),
            description: create.description.clone(),
            warm: create.warm,
            pvc_name_template_use_generate_name: create.pvc_name_template_use_generate_name,
        })
        .await?;

    if create.output.as_deref() == Some("yaml") {
        let yaml = serde_yaml::to_string(&plan)
            .map_err(|e| Error::Internal(format!("rendering plan: {e}")))?;
        print!("{yaml}");
    } else {
        println!(
            "plan '{}' created with {} VMs",
            plan.name(),
            plan.spec.vms.len()
        );
    }
    Ok(())
}

async fn start_plan(args: &Args, plan_name: &str) -> Result<()> {
    let cluster = ClusterClient::connect().await?;

    // the migration references the plan by name; fail early if it is gone
    cluster
        .get_plan(&args.namespace, plan_name)
        .await?
        .ok_or_else(|| Error::NotFound {
            kind: "Plan".into(),
            namespace: args.namespace.clone(),
            name: plan_name.into(),
        })?;

    let migration = Migration {
        metadata: ObjectMeta {
            generate_name: Some(format!("{plan_name}-")),
            namespace: Some(args.namespace.clone()),
            ..Default::default()
        },
        spec: MigrationSpec {
            plan: ObjectRef::new(plan_name, args.namespace.clone()),
        },
    };

    let created = cluster.create_migration(&migration).await?;
    info!(migration = ?created.metadata.name, "migration created");
    println!(
        "migration '{}' started for plan '{}'",
        created.metadata.name.as_deref().unwrap_or("unknown"),
        plan_name
    );
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("kube=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
