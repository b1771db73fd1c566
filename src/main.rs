use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use implant_market::simulation::{AdverseEventRisk, Model, ModelConfig, PatientIncidence, RunSummary};

#[derive(Parser)]
#[command(name = "implant_market")]
#[command(about = "Additive vs subtractive implant market simulation")]
struct Cli {
    /// JSON model configuration; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of simulated days
    #[arg(long)]
    steps: Option<u64>,

    /// Number of healthcare providers
    #[arg(long)]
    providers: Option<usize>,

    /// Maximum concurrent surgery patients per provider
    #[arg(long)]
    provider_capacity: Option<usize>,

    /// Patients present before the first step
    #[arg(long)]
    initial_patients: Option<usize>,

    /// Upper bound of the daily new-patient draw
    #[arg(long)]
    incidence: Option<u32>,

    /// Spawn exactly the incidence bound every day instead of drawing
    #[arg(long)]
    fixed_incidence: bool,

    /// Probability a new patient is routed to the additive manufacturer
    #[arg(long)]
    additive_preference: Option<f64>,

    /// Reweight the preference by each provider's observed additive outcomes
    #[arg(long)]
    adaptive: bool,

    /// Adverse-event probability after a worse follow-up, both manufacturers
    #[arg(long)]
    ae_probability: Option<f64>,

    /// Adverse-event probability for additive implants (overrides --ae-probability)
    #[arg(long)]
    additive_ae_probability: Option<f64>,

    /// Adverse-event probability for subtractive implants (overrides --ae-probability)
    #[arg(long)]
    subtractive_ae_probability: Option<f64>,

    /// Production lead time of the subtractive manufacturer, in steps
    #[arg(long)]
    subtractive_lag: Option<u64>,

    /// Target inventory of both manufacturers
    #[arg(long)]
    initial_inventory: Option<u32>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Log a model summary every N steps (0 disables)
    #[arg(long, default_value = "30")]
    report_every: u64,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn model_config(&self) -> Result<ModelConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => ModelConfig::default(),
        };

        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(providers) = self.providers {
            config.num_providers = providers;
        }
        if let Some(capacity) = self.provider_capacity {
            config.provider_capacity = capacity;
        }
        if let Some(initial) = self.initial_patients {
            config.initial_patients = initial;
        }
        let bound = self.incidence.unwrap_or(config.incidence.bound());
        config.incidence = if self.fixed_incidence {
            PatientIncidence::Exactly(bound)
        } else {
            match config.incidence {
                PatientIncidence::Exactly(_) => PatientIncidence::Exactly(bound),
                PatientIncidence::UpTo(_) => PatientIncidence::UpTo(bound),
            }
        };
        if let Some(preference) = self.additive_preference {
            config.additive_adoption_preference = preference;
        }
        if self.adaptive {
            config.adaptive_preference = true;
        }
        if let Some(probability) = self.ae_probability {
            config.ae_probability = AdverseEventRisk::uniform(probability);
        }
        if let Some(probability) = self.additive_ae_probability {
            config.ae_probability.additive = probability;
        }
        if let Some(probability) = self.subtractive_ae_probability {
            config.ae_probability.subtractive = probability;
        }
        if let Some(lag) = self.subtractive_lag {
            config.subtractive.production_lag = lag;
        }
        if let Some(inventory) = self.initial_inventory {
            config.additive.initial_inventory = inventory;
            config.subtractive.initial_inventory = inventory;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,implant_market=info"),
    )
    .init();

    let cli = Cli::parse();
    let config = cli.model_config()?;
    run_headless(config, cli.report_every, cli.json)
}

/// Run the simulation to completion and report the results
fn run_headless(config: ModelConfig, report_every: u64, json: bool) -> Result<()> {
    info!("Running implant market simulation...");
    info!(
        "Steps: {}, Providers: {}, Initial patients: {}, Incidence: {:?}, Additive preference: {}",
        config.steps,
        config.num_providers,
        config.initial_patients,
        config.incidence,
        config.additive_adoption_preference
    );

    let mut model = Model::new(config).context("Invalid model configuration")?;
    model.log_summary();

    while !model.is_finished() {
        model.step();
        if report_every > 0 && model.current_step() % report_every == 0 {
            model.log_summary();
        }
    }

    let summary = RunSummary::from_history(model.history());
    summary.log();

    if json {
        let text = serde_json::to_string_pretty(&summary).context("Failed to encode run summary")?;
        println!("{}", text);
    }
    Ok(())
}
