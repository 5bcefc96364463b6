use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use similar::{ChangeTag, TextDiff};

use talus_core::differ::create_plan;
use talus_core::effect::Effect;
use talus_core::interpreter::{EffectOutcome, Interpreter, InterpreterConfig};
use talus_core::plan::{Plan, format_effect_brief};
use talus_core::provider::Provider;
use talus_core::resource::{Resource, ResourceId, State};
use talus_provider_cs::{CsConfig, CsProvider, schema};
use talus_state::{LocalBackend, ResourceState, StateBackend, StateFile, json_to_value};

#[derive(Parser)]
#[command(name = "talus")]
#[command(about = "A declarative manager for container-service node pools", long_about = None)]
struct Cli {
    /// Path to the JSON manifest
    #[arg(long, default_value = "talus.json", global = true)]
    manifest: PathBuf,

    /// Path to the state file
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the manifest against the resource schemas
    Validate,
    /// Show execution plan without applying changes
    Plan,
    /// Apply changes to reach the declared state
    Apply,
    /// Destroy all resources tracked in state
    Destroy {
        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,
    },
    /// Force-release a stuck state lock
    ForceUnlock {
        /// Lock ID to release
        lock_id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let backend = match cli.state {
        Some(path) => LocalBackend::with_path(path),
        None => LocalBackend::new(),
    };

    let result = match cli.command {
        Commands::Validate => run_validate(&cli.manifest),
        Commands::Plan => run_plan(&cli.manifest, &backend).await,
        Commands::Apply => run_apply(&cli.manifest, &backend).await,
        Commands::Destroy { auto_approve } => {
            run_destroy(&cli.manifest, &backend, auto_approve).await
        }
        Commands::ForceUnlock { lock_id } => run_force_unlock(&backend, &lock_id).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[derive(Deserialize)]
struct Manifest {
    provider: ProviderSettings,
    #[serde(default)]
    resources: Vec<ManifestResource>,
}

#[derive(Deserialize)]
struct ProviderSettings {
    endpoint: String,
    region_id: String,
    /// Environment variable that holds the API token
    #[serde(default = "default_token_env")]
    token_env: String,
}

fn default_token_env() -> String {
    "CS_TOKEN".to_string()
}

#[derive(Deserialize)]
struct ManifestResource {
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
}

fn load_manifest(path: &PathBuf) -> Result<Manifest, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Invalid manifest: {}", e))
}

fn manifest_resources(manifest: &Manifest) -> Result<Vec<Resource>, String> {
    let node_pool = schema::node_pool();
    let mut resources = Vec::new();
    for declared in &manifest.resources {
        if declared.resource_type != "node_pool" {
            return Err(format!(
                "Unsupported resource type '{}' for {}",
                declared.resource_type, declared.name
            ));
        }

        let mut resource = Resource::new(declared.resource_type.clone(), declared.name.clone());
        for (key, value) in &declared.attributes {
            match json_to_value(value) {
                Some(value) => {
                    resource.attributes.insert(key.clone(), value);
                }
                None => {
                    return Err(format!(
                        "{}.{}: attribute '{}' has an unsupported value",
                        declared.resource_type, declared.name, key
                    ));
                }
            }
        }
        // Defaults participate in diffing, so dropping an attribute with a
        // default reads as a change back to that default
        node_pool.apply_defaults(&mut resource.attributes);
        resources.push(resource);
    }
    Ok(resources)
}

fn build_provider(settings: &ProviderSettings) -> Result<CsProvider, String> {
    let token = std::env::var(&settings.token_env).map_err(|_| {
        format!(
            "API token not found: set the {} environment variable",
            settings.token_env
        )
    })?;

    Ok(CsProvider::from_config(CsConfig {
        endpoint: settings.endpoint.clone(),
        region_id: settings.region_id.clone(),
        token,
    }))
}

fn validate_resources(resources: &[Resource]) -> Result<(), String> {
    let node_pool = schema::node_pool();
    let mut all_errors = Vec::new();

    for resource in resources {
        if let Err(errors) = node_pool.validate(&resource.attributes) {
            for error in errors {
                all_errors.push(format!("{}: {}", resource.id, error));
            }
        }
    }

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors.join("\n"))
    }
}

fn run_validate(manifest_path: &PathBuf) -> Result<(), String> {
    let manifest = load_manifest(manifest_path)?;
    let resources = manifest_resources(&manifest)?;

    println!("{}", "Validating...".cyan());
    validate_resources(&resources)?;

    println!(
        "{}",
        format!("✓ {} resources validated successfully.", resources.len())
            .green()
            .bold()
    );
    for resource in &resources {
        println!("  • {}", resource.id);
    }
    Ok(())
}

/// Refresh remote state for every declared resource.
///
/// The refreshed attributes are overlaid on the stored ones so fields the
/// remote side never reports back (the login password, most notably) keep
/// their last recorded value for diffing.
async fn refresh_states(
    provider: &CsProvider,
    state_file: &StateFile,
    resources: &[Resource],
) -> Result<HashMap<ResourceId, State>, String> {
    let mut current = HashMap::new();

    for resource in resources {
        let recorded = state_file.find_resource(&resource.id.resource_type, &resource.id.name);
        let identifier = recorded.and_then(|r| r.identifier.clone());

        let Some(identifier) = identifier else {
            current.insert(resource.id.clone(), State::not_found(resource.id.clone()));
            continue;
        };

        let refreshed = provider
            .read(resource, Some(identifier.as_str()))
            .await
            .map_err(|e| format!("Failed to refresh {}: {}", resource.id, e))?;

        if !refreshed.exists {
            current.insert(resource.id.clone(), refreshed);
            continue;
        }

        let mut attributes = recorded.map(|r| r.to_values()).unwrap_or_default();
        attributes.extend(refreshed.attributes);
        let state =
            State::existing(resource.id.clone(), attributes).with_identifier(identifier);
        current.insert(resource.id.clone(), state);
    }

    Ok(current)
}

/// Resources tracked in state but no longer declared in the manifest
fn orphaned_resources(state_file: &StateFile, desired: &[Resource]) -> Vec<ResourceState> {
    state_file
        .resources
        .iter()
        .filter(|recorded| {
            !desired.iter().any(|r| {
                r.id.resource_type == recorded.resource_type && r.id.name == recorded.name
            })
        })
        .cloned()
        .collect()
}

/// Rebuild a delete effect from a state record; the recorded attributes
/// give the provider its context (cluster_id) and the identifier names
/// the remote pool
fn delete_effect(recorded: &ResourceState) -> Effect {
    let mut resource = Resource::new(recorded.resource_type.clone(), recorded.name.clone());
    resource.attributes = recorded.to_values();
    Effect::Delete {
        resource,
        identifier: recorded.identifier.clone(),
    }
}

/// Diff the declared resources against refreshed state and append delete
/// effects for everything tracked in state but no longer declared
fn build_plan(
    resources: &[Resource],
    current: &HashMap<ResourceId, State>,
    state_file: &StateFile,
) -> Plan {
    let computed = schema::node_pool().computed_attribute_names();
    let mut plan = create_plan(resources, current, &computed);
    for orphan in orphaned_resources(state_file, resources) {
        plan.add(delete_effect(&orphan));
    }
    plan
}

fn print_plan(plan: &Plan) {
    if plan.is_empty() {
        println!("{}", "No changes. Infrastructure is up-to-date.".green());
        return;
    }

    println!("{}", "Execution Plan:".cyan().bold());
    println!();

    for effect in plan.effects() {
        match effect {
            Effect::Create(resource) => {
                println!("  {} {}", "+".green().bold(), resource.id.to_string().cyan());
            }
            Effect::Update { id, from, to } => {
                println!("  {} {}", "~".yellow().bold(), id.to_string().cyan());
                print_attribute_diff(from, to);
            }
            Effect::Delete { resource, .. } => {
                println!("  {} {}", "-".red().bold(), resource.id.to_string().cyan());
            }
            Effect::Read(_) => {}
        }
    }

    let summary = plan.summary();
    println!();
    println!(
        "Plan: {} to create, {} to update, {} to delete.",
        summary.create.to_string().green(),
        summary.update.to_string().yellow(),
        summary.delete.to_string().red()
    );
}

/// Render a line diff of the attribute maps (secrets excluded)
fn print_attribute_diff(from: &State, to: &Resource) {
    let before = render_attributes(&from.attributes);
    let after = render_attributes(&to.attributes);

    let diff = TextDiff::from_lines(&before, &after);
    for change in diff.iter_all_changes() {
        let line = change.value().trim_end();
        match change.tag() {
            ChangeTag::Delete => println!("      {} {}", "-".red(), line.red()),
            ChangeTag::Insert => println!("      {} {}", "+".green(), line.green()),
            ChangeTag::Equal => {}
        }
    }
}

const SENSITIVE_ATTRIBUTES: &[&str] = &["password", "kms_encrypted_password"];

fn render_attributes(
    attributes: &HashMap<String, talus_core::resource::Value>,
) -> String {
    let ordered: BTreeMap<&str, serde_json::Value> = attributes
        .iter()
        .map(|(key, value)| {
            if SENSITIVE_ATTRIBUTES.contains(&key.as_str()) {
                (key.as_str(), serde_json::Value::String("(sensitive)".to_string()))
            } else {
                (key.as_str(), talus_state::value_to_json(value))
            }
        })
        .collect();

    ordered
        .iter()
        .map(|(key, value)| format!("{} = {}\n", key, value))
        .collect()
}

async fn run_plan(manifest_path: &PathBuf, backend: &LocalBackend) -> Result<(), String> {
    let manifest = load_manifest(manifest_path)?;
    let resources = manifest_resources(&manifest)?;
    validate_resources(&resources)?;

    let provider = build_provider(&manifest.provider)?;
    let state_file = read_state(backend).await?;

    let current = refresh_states(&provider, &state_file, &resources).await?;
    let plan = build_plan(&resources, &current, &state_file);

    print_plan(&plan);
    Ok(())
}

async fn run_apply(manifest_path: &PathBuf, backend: &LocalBackend) -> Result<(), String> {
    let manifest = load_manifest(manifest_path)?;
    let resources = manifest_resources(&manifest)?;
    validate_resources(&resources)?;
    let provider = build_provider(&manifest.provider)?;

    let lock = backend
        .acquire_lock("apply")
        .await
        .map_err(|e| e.to_string())?;
    let result = apply_locked(backend, &provider, &resources).await;
    if let Err(e) = backend.release_lock(&lock).await {
        eprintln!("{} failed to release state lock: {}", "Warning:".yellow(), e);
    }
    result
}

async fn apply_locked(
    backend: &LocalBackend,
    provider: &CsProvider,
    resources: &[Resource],
) -> Result<(), String> {
    let mut state_file = read_state(backend).await?;

    let current = refresh_states(provider, &state_file, resources).await?;
    let plan = build_plan(resources, &current, &state_file);

    if plan.is_empty() {
        println!("{}", "No changes. Infrastructure is up-to-date.".green());
        return Ok(());
    }

    print_plan(&plan);
    println!();
    println!("{}", "Applying changes...".cyan().bold());
    println!();

    let interpreter = Interpreter::new(provider).with_config(InterpreterConfig {
        dry_run: false,
        continue_on_error: true,
    });
    let result = interpreter.apply(&plan).await;
    record_outcomes(&mut state_file, &plan, &result.outcomes);

    state_file.increment_serial();
    backend
        .write_state(&state_file)
        .await
        .map_err(|e| format!("Failed to write state: {}", e))?;

    println!();
    if result.is_success() {
        println!(
            "{}",
            format!("Apply complete! {} changes applied.", result.success_count)
                .green()
                .bold()
        );
        Ok(())
    } else {
        Err(format!(
            "Apply failed. {} succeeded, {} failed.",
            result.success_count, result.failure_count
        ))
    }
}

/// Fold interpreter outcomes back into the state file, reporting each
/// effect as it resolved
fn record_outcomes(
    state_file: &mut StateFile,
    plan: &Plan,
    outcomes: &[Result<EffectOutcome, talus_core::provider::ProviderError>],
) {
    for (effect, outcome) in plan.effects().iter().zip(outcomes) {
        match (effect, outcome) {
            (Effect::Create(resource), Ok(EffectOutcome::Created { state })) => {
                println!("  {} + {}", "✓".green(), resource.id);
                record_resource(state_file, resource, state);
            }
            (Effect::Update { id, to, .. }, Ok(EffectOutcome::Updated { state })) => {
                println!("  {} ~ {}", "✓".green(), id);
                record_resource(state_file, to, state);
            }
            (Effect::Delete { resource, .. }, Ok(EffectOutcome::Deleted)) => {
                println!("  {} - {}", "✓".green(), resource.id);
                state_file.remove_resource(&resource.id.resource_type, &resource.id.name);
            }
            (_, Ok(_)) => {}
            (effect, Err(e)) => {
                println!("  {} {} - {}", "✗".red(), format_effect_brief(effect), e);
            }
        }
    }
}

async fn run_destroy(
    manifest_path: &PathBuf,
    backend: &LocalBackend,
    auto_approve: bool,
) -> Result<(), String> {
    let manifest = load_manifest(manifest_path)?;
    let provider = build_provider(&manifest.provider)?;

    let lock = backend
        .acquire_lock("destroy")
        .await
        .map_err(|e| e.to_string())?;
    let result = destroy_locked(backend, &provider, auto_approve).await;
    if let Err(e) = backend.release_lock(&lock).await {
        eprintln!("{} failed to release state lock: {}", "Warning:".yellow(), e);
    }
    result
}

async fn destroy_locked(
    backend: &LocalBackend,
    provider: &CsProvider,
    auto_approve: bool,
) -> Result<(), String> {
    let mut state_file = read_state(backend).await?;

    if state_file.resources.is_empty() {
        println!("{}", "No resources to destroy.".green());
        return Ok(());
    }

    let mut plan = Plan::new();
    for recorded in &state_file.resources {
        plan.add(delete_effect(recorded));
    }

    println!("{}", "Destroy Plan:".red().bold());
    println!();
    for effect in plan.effects() {
        println!(
            "  {} {}",
            "-".red().bold(),
            effect.resource_id().to_string().cyan()
        );
    }
    println!();
    println!("Plan: {} to destroy.", plan.effects().len().to_string().red());
    println!();

    if !auto_approve && !confirm_destroy()? {
        println!("{}", "Destroy cancelled.".yellow());
        return Ok(());
    }

    println!("{}", "Destroying resources...".red().bold());
    println!();

    let interpreter = Interpreter::new(provider).with_config(InterpreterConfig {
        dry_run: false,
        continue_on_error: true,
    });
    let result = interpreter.apply(&plan).await;
    record_outcomes(&mut state_file, &plan, &result.outcomes);

    state_file.increment_serial();
    backend
        .write_state(&state_file)
        .await
        .map_err(|e| format!("Failed to write state: {}", e))?;

    println!();
    if result.is_success() {
        println!(
            "{}",
            format!("Destroy complete! {} resources destroyed.", result.success_count)
                .green()
                .bold()
        );
        Ok(())
    } else {
        Err(format!(
            "Destroy failed. {} succeeded, {} failed.",
            result.success_count, result.failure_count
        ))
    }
}

async fn run_force_unlock(backend: &LocalBackend, lock_id: &str) -> Result<(), String> {
    backend
        .force_unlock(lock_id)
        .await
        .map_err(|e| e.to_string())?;
    println!("{}", "Lock released.".green());
    Ok(())
}

async fn read_state(backend: &LocalBackend) -> Result<StateFile, String> {
    Ok(backend
        .read_state()
        .await
        .map_err(|e| format!("Failed to read state: {}", e))?
        .unwrap_or_default())
}

/// Record a resource in state: the applied remote state overlaid with the
/// declared attributes the remote side never reports back
fn record_resource(state_file: &mut StateFile, declared: &Resource, applied: &State) {
    let mut attributes = applied.attributes.clone();
    for (key, value) in &declared.attributes {
        attributes.entry(key.clone()).or_insert_with(|| value.clone());
    }

    let mut recorded = ResourceState::from_values(
        declared.id.resource_type.clone(),
        declared.id.name.clone(),
        "cs",
        &attributes,
    );
    recorded.identifier = applied.identifier.clone();
    state_file.upsert_resource(recorded);
}

fn confirm_destroy() -> Result<bool, String> {
    println!(
        "{}",
        "Do you really want to destroy all resources?".yellow().bold()
    );
    println!(
        "  {}",
        "This action cannot be undone. Type 'yes' to confirm.".yellow()
    );
    print!("\n  Enter a value: ");
    std::io::Write::flush(&mut std::io::stdout()).map_err(|e| e.to_string())?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| e.to_string())?;
    println!();

    Ok(input.trim() == "yes")
}
