//! ArgMatches → run configuration.

use std::time::Duration;

use clap::ArgMatches;

use kvdiff_core::KeySet;
use kvdiff_driver::DriverConfig;
use kvdiff_store::ProcessConfig;

use crate::format::OutputMode;

/// Everything one `kvdiff` invocation needs.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub process: ProcessConfig,
    pub driver: DriverConfig,
    pub seed: u64,
    pub seed_count: u64,
    pub catalog_seed: u64,
    pub only: Option<String>,
    pub output: OutputMode,
    pub verbosity: u8,
}

impl Invocation {
    /// Seeds `seed..seed+seed_count`, wrapping at `u64::MAX`.
    pub fn seeds(&self) -> Vec<u64> {
        (0..self.seed_count)
            .map(|i| self.seed.wrapping_add(i))
            .collect()
    }

    /// Apply `--only` to a catalog.
    pub fn select(&self, catalog: Vec<KeySet>) -> Vec<KeySet> {
        match &self.only {
            Some(pattern) => catalog
                .into_iter()
                .filter(|k| k.name().contains(pattern.as_str()))
                .collect(),
            None => catalog,
        }
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(
    matches: &'a ArgMatches,
    id: &str,
) -> Result<&'a T, String> {
    matches
        .get_one::<T>(id)
        .ok_or_else(|| format!("missing argument: {}", id))
}

/// Convert parsed arguments into a validated invocation.
pub fn matches_to_invocation(matches: &ArgMatches) -> Result<Invocation, String> {
    let candidate = required::<String>(matches, "candidate")?;
    let seed = *required::<u64>(matches, "seed")?;
    let seed_count = *required::<u64>(matches, "seeds")?;
    let catalog_seed = matches.get_one::<u64>("catalog-seed").copied().unwrap_or(seed);
    let loops = *required::<u64>(matches, "loops")?;
    let lookup_ms = *required::<u64>(matches, "lookup-timeout-ms")?;
    let shutdown_ms = *required::<u64>(matches, "shutdown-timeout-ms")?;

    let args: Vec<String> = matches
        .get_many::<String>("arg")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let process = ProcessConfig::new(candidate)
        .with_args(args)
        .with_lookup_timeout(Duration::from_millis(lookup_ms))
        .with_shutdown_timeout(Duration::from_millis(shutdown_ms));
    process.validate().map_err(|e| e.to_string())?;

    let loop_count =
        usize::try_from(loops).map_err(|_| format!("loop count {} is too large", loops))?;
    let driver = DriverConfig::default()
        .with_loop_count(loop_count)
        .with_catalog_seed(catalog_seed);
    driver.validate().map_err(|e| e.to_string())?;

    let output = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    Ok(Invocation {
        process,
        driver,
        seed,
        seed_count,
        catalog_seed,
        only: matches.get_one::<String>("only").cloned(),
        output,
        verbosity: matches.get_count("verbose"),
    })
}
