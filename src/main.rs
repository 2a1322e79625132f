use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use creditlens::application::comparison::compare_companies;
use creditlens::application::explainer::Explainer;
use creditlens::application::ml::predictor::CreditScorer;
use creditlens::application::ml::score_predictor::ScorePredictor;
use creditlens::application::ml::training_set::TrainingSet;
use creditlens::config::Config;
use creditlens::domain::company::CompanyData;
use creditlens::domain::explanation::Explanation;
use creditlens::domain::ports::CompanyDataSource;
use creditlens::infrastructure::news::sentiment_analyzer::SentimentAnalyzer;
use creditlens::infrastructure::{CachedSource, JsonCompanyStore, TtlCache};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about = "Explainable corporate credit scoring", long_about = None)]
struct Cli {
    /// Company data file (JSON object keyed by ticker)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Model bundle path
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model on the configured tickers and save it
    Train {
        /// Where to write the model bundle (defaults to --model / MODEL_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score one company and explain the result
    Score {
        ticker: String,

        /// Print the explanation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score several companies side by side
    Compare {
        #[arg(required = true, num_args = 2..)]
        tickers: Vec<String>,
    },
    /// Show the trained model's feature importance
    Importance {
        /// Number of features to show
        #[arg(short, long, default_value_t = 16)]
        top: usize,
    },
    /// Write the heuristic-labelled training set as CSV
    ExportTraining {
        #[arg(short, long)]
        output: PathBuf,
    },
}

type Source = CachedSource<JsonCompanyStore>;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let data_path = cli.data.unwrap_or_else(|| config.data.data_path.clone());
    let model_path = cli.model.unwrap_or_else(|| config.model.model_path.clone());

    let store = JsonCompanyStore::from_path(&data_path)?;
    let source = CachedSource::new(
        store,
        TtlCache::new(chrono::Duration::seconds(config.data.cache_ttl_secs)),
    );
    let analyzer = SentimentAnalyzer::new();

    match cli.command {
        Commands::Train { output } => {
            let companies = load_companies(&source, &analyzer, &config.data.tickers)?;
            let mut predictor = ScorePredictor::new(config.model.gbm.clone());
            let model = predictor.train(&companies)?;
            info!(
                "Trained {} trees over {} features",
                model.n_trees(),
                model.feature_names().len()
            );

            let output = output.unwrap_or(model_path);
            predictor.save(&output)?;
            print_importance(&predictor, 5)?;
        }
        Commands::Score { ticker, json } => {
            let ticker = ticker.to_uppercase();
            let company = fetch_company(&source, &analyzer, &ticker)?;
            let predictor = load_or_train(&source, &analyzer, &config, &model_path)?;

            let score = predictor.score(&company)?;
            let explanation = Explainer::new().explain(&company, score);

            if json {
                println!("{}", serde_json::to_string_pretty(&explanation)?);
            } else {
                print_explanation(&ticker, &explanation);
            }
        }
        Commands::Compare { tickers } => {
            let mut companies = Vec::with_capacity(tickers.len());
            for ticker in tickers {
                let ticker = ticker.to_uppercase();
                let company = fetch_company(&source, &analyzer, &ticker)?;
                companies.push((ticker, company));
            }
            let predictor = load_or_train(&source, &analyzer, &config, &model_path)?;

            let rows = compare_companies(&predictor, &companies)?;
            println!(
                "{:<8} {:<28} {:>7} {:<10} {:>9} {:>8} {:>8} {:>8} {:>10}",
                "Ticker", "Company", "Score", "Risk", "D/E", "Current", "ROE %", "Margin", "Cap ($B)"
            );
            for row in rows {
                println!(
                    "{:<8} {:<28} {:>7.1} {:<10} {:>9.1} {:>8.2} {:>8.1} {:>8.1} {:>10.1}",
                    row.ticker,
                    row.company,
                    row.credit_score,
                    row.risk_level.to_string(),
                    row.debt_to_equity,
                    row.current_ratio,
                    row.return_on_equity,
                    row.profit_margin,
                    row.market_cap_billions
                );
            }
        }
        Commands::Importance { top } => {
            let mut predictor = ScorePredictor::default();
            predictor
                .load(&model_path)
                .with_context(|| format!("Failed to load model from {:?}", model_path))?;
            print_importance(&predictor, top)?;
        }
        Commands::ExportTraining { output } => {
            let companies = load_companies(&source, &analyzer, &config.data.tickers)?;
            let training_set = TrainingSet::from_companies(&companies);
            training_set
                .export_csv(&output)
                .with_context(|| format!("Failed to write {:?}", output))?;
            info!("Wrote {} samples to {:?}", training_set.len(), output);
        }
    }

    Ok(())
}

fn fetch_company(source: &Source, analyzer: &SentimentAnalyzer, ticker: &str) -> Result<CompanyData> {
    let mut company = source
        .fetch(ticker)?
        .with_context(|| format!("No data available for {}", ticker))?;
    analyzer.enrich(&mut company);
    Ok(company)
}

fn load_companies(
    source: &Source,
    analyzer: &SentimentAnalyzer,
    tickers: &[String],
) -> Result<BTreeMap<String, CompanyData>> {
    let mut companies = source.fetch_many(tickers)?;
    for company in companies.values_mut() {
        analyzer.enrich(company);
    }
    Ok(companies)
}

/// Loads the saved model, training and saving a fresh one when none is usable.
fn load_or_train(
    source: &Source,
    analyzer: &SentimentAnalyzer,
    config: &Config,
    model_path: &Path,
) -> Result<ScorePredictor> {
    let mut predictor = ScorePredictor::new(config.model.gbm.clone());
    if model_path.exists() {
        match predictor.load(model_path) {
            Ok(()) => return Ok(predictor),
            Err(e) => warn!("Retraining, saved model unusable: {}", e),
        }
    }

    let companies = load_companies(source, analyzer, &config.data.tickers)?;
    predictor.train(&companies)?;
    if let Err(e) = predictor.save(model_path) {
        warn!("Could not save model to {:?}: {}", model_path, e);
    }
    Ok(predictor)
}

fn print_importance(predictor: &ScorePredictor, top: usize) -> Result<()> {
    println!("{:<24} {:>10}", "Feature", "Importance");
    for (feature, importance) in predictor.feature_importance()?.into_iter().take(top) {
        println!("{:<24} {:>10.4}", feature.label(), importance);
    }
    Ok(())
}

fn print_explanation(ticker: &str, explanation: &Explanation) {
    println!("{} ({})", explanation.company_name, ticker);
    println!(
        "Credit score: {:.1}/100  Risk: {} ({})",
        explanation.overall_score,
        explanation.risk_category.level,
        explanation.risk_category.description
    );
    println!();
    println!("{}", explanation.summary);

    if !explanation.key_strengths.is_empty() {
        println!();
        println!("Strengths:");
        for entry in &explanation.key_strengths {
            println!("  + {}: {}", entry.feature.label(), entry.explanation);
        }
    }
    if !explanation.key_weaknesses.is_empty() {
        println!();
        println!("Weaknesses:");
        for entry in &explanation.key_weaknesses {
            println!("  - {}: {}", entry.feature.label(), entry.explanation);
        }
    }
    if !explanation.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in &explanation.recommendations {
            println!("  [{:?}] {}: {}", rec.priority, rec.category, rec.recommendation);
        }
    }
    if !explanation.recent_events.is_empty() {
        println!();
        println!("Recent news:");
        for item in &explanation.recent_events {
            println!("  * {}", item.title);
        }
    }
}
