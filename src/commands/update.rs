use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::{connect, GatewayArgs, VersionArgs};
use crate::client::GatewayApi;
use crate::format::{self, DefinitionFormat};
use crate::lifecycle::{self, VersionSelector};
use crate::GlobalArgs;

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub gateway: GatewayArgs,
    #[command(flatten)]
    pub version: VersionArgs,
    /// Relative or absolute path to the Swagger or RAML file
    #[arg(long)]
    pub file: PathBuf,
}

pub async fn run(global: &GlobalArgs, args: UpdateArgs) -> Result<()> {
    let file = &args.file;
    if !file.is_file() {
        bail!(
            "the Swagger or RAML file {} is not a valid file, or it cannot be found",
            file.display()
        );
    }
    let file_format = format::require_format(file)?;
    info!("Using {file_format} file: {}", file.display());

    let client = connect(global)?;
    import_definition(
        &client,
        &args.gateway.name(),
        &args.version.version,
        file,
        file_format,
    )
    .await
}

/// Import `file` into the selected version of `name`
///
/// The resource comparison is advisory, and a refused import is reported
/// without failing the call. Lookup and transport errors are returned.
pub async fn import_definition<A: GatewayApi + ?Sized>(
    api: &A,
    name: &str,
    selector: &VersionSelector,
    file: &Path,
    file_format: DefinitionFormat,
) -> Result<()> {
    let id = lifecycle::locate(api, name)
        .await
        .with_context(|| format!("no API definition could be found with the name '{name}'"))?;

    info!("Retrieving version from API: {id}");
    let resolved = lifecycle::resolve(api, &id, selector)
        .await
        .context("Error getting latest version!")?;
    let api_name = resolved.gateway_name.unwrap_or_else(|| name.to_string());
    let version = resolved.number;
    info!("Using version Id: {version} for API definition: {api_name}");

    // the comparison is informational, the import goes ahead either way
    info!("Comparing API definition resources with {file_format} definition...");
    match lifecycle::compare_resource_counts(api, &id, &version, file, file_format).await {
        Ok(counts) => {
            info!(
                "{file_format} file resources: {}. API Definition Resources: {}.",
                counts.local, counts.backend
            );
            if !counts.matches() {
                warn!(local = counts.local, backend = counts.backend, "resource counts differ");
            }
            let backend_only = counts.backend_only();
            if !backend_only.is_empty() {
                warn!(
                    "Resources not declared in {}: {}",
                    file.display(),
                    backend_only.join(", ")
                );
            }
            let local_only = counts.local_only();
            if !local_only.is_empty() {
                info!("New resources in {}: {}", file.display(), local_only.join(", "));
            }
        }
        Err(e) => {
            error!(
                error = %e,
                "Error encountered obtaining API resource counts for version: {version}"
            );
            warn!("Proceeding...");
        }
    }

    info!("Importing new API definitions from file: {}", file.display());
    let (_, resp) = lifecycle::upload_definition(api, &id, &version, file)
        .await
        .context("Error importing API definition!")?;

    if resp.is_success() {
        info!("Import Success! Response code: {}", resp.status);
        println!("✅ imported {} into `{api_name}` version {version}", file.display());
    } else {
        error!(status = resp.status, "API Gateway returned an error!");
        error!("Error: {}", resp.body);
    }
    Ok(())
}
