//! Export and import CLI commands

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use crate::error::{ForecastError, ForecastResult};
use crate::export::{
    apply_import, export_banks_json, export_budget_csv, export_full_json, export_full_yaml,
    import_from_json, import_from_yaml,
};
use crate::storage::Storage;

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// Budget items and bank accounts
    Full,
    /// Bank accounts with a summary
    Banks,
    /// Budget items as CSV
    BudgetCsv,
}

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file
    pub file: PathBuf,

    /// Write YAML instead of JSON (full export only)
    #[arg(long)]
    pub yaml: bool,

    /// What to export
    #[arg(short, long, value_enum, default_value = "full")]
    pub kind: ExportKind,
}

/// Arguments for `import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON or YAML export to load; replaces all current data
    pub file: PathBuf,
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Handle the export command
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> ForecastResult<()> {
    let file = File::create(&args.file).map_err(|e| {
        ForecastError::Export(format!("Failed to create {}: {}", args.file.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    let store = storage.store();

    match args.kind {
        ExportKind::Full if args.yaml => export_full_yaml(store, &mut writer)?,
        ExportKind::Full => export_full_json(store, &mut writer, true)?,
        ExportKind::Banks => export_banks_json(store, &mut writer)?,
        ExportKind::BudgetCsv => export_budget_csv(store, &mut writer)?,
    }

    println!(
        "Exported {} budget items and {} bank accounts to {}",
        store.budget_items().len(),
        store.banks().len(),
        args.file.display()
    );
    Ok(())
}

/// Handle the import command
pub fn handle_import_command(storage: &mut Storage, args: ImportArgs) -> ForecastResult<()> {
    let contents = fs::read_to_string(&args.file).map_err(|e| {
        ForecastError::Import(format!("Error reading file {}: {}", args.file.display(), e))
    })?;

    let document = if is_yaml(&args.file) {
        import_from_yaml(&contents)?
    } else {
        import_from_json(&contents)?
    };

    apply_import(storage, document)
}
