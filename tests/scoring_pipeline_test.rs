use chrono::Duration;
use creditlens::application::comparison::compare_companies;
use creditlens::application::explainer::Explainer;
use creditlens::application::ml::predictor::{CreditScorer, HeuristicScorer};
use creditlens::application::ml::score_predictor::ScorePredictor;
use creditlens::config::DEFAULT_UNIVERSE;
use creditlens::domain::company::CompanyData;
use creditlens::domain::explanation::{ImpactType, RiskLevel, Strength};
use creditlens::domain::ml::feature_registry::{Feature, FeatureVector};
use creditlens::domain::ml::gradient_boosting::GbmParams;
use creditlens::domain::ml::heuristic::{heuristic_breakdown, heuristic_score};
use creditlens::domain::ports::CompanyDataSource;
use creditlens::infrastructure::news::sentiment_analyzer::SentimentAnalyzer;
use creditlens::infrastructure::{CachedSource, JsonCompanyStore, TtlCache};
use std::path::PathBuf;

fn sample_data_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/companies.json")
}

fn strong_company() -> CompanyData {
    CompanyData::new("Strong Industries")
        .with_ticker("STRG")
        .with_metric("current_ratio", 2.5)
        .with_metric("return_on_equity", 18.0)
        .with_metric("debt_to_equity", 20.0)
        .with_metric("profit_margin", 25.0)
        .with_metric("sentiment_score", 70.0)
        .with_metric("revenue_growth", 12.0)
        .with_metric("stock_volatility", 10.0)
}

#[test]
fn test_strong_company_scores_and_explains() {
    let company = strong_company();
    let features = FeatureVector::extract(&company);

    let raw: f64 = 50.0
        + heuristic_breakdown(&features)
            .iter()
            .map(|c| c.points)
            .sum::<f64>();
    assert_eq!(raw, 115.0);
    assert_eq!(heuristic_score(&features), 100.0);

    let score = HeuristicScorer.score(&company).unwrap();
    let explanation = Explainer::new().explain(&company, score);

    assert_eq!(explanation.company_name, "Strong Industries");
    assert_eq!(explanation.risk_category.level, RiskLevel::Low);

    let strengths: Vec<Feature> = explanation
        .key_strengths
        .iter()
        .map(|entry| entry.feature)
        .collect();
    assert_eq!(
        strengths,
        vec![
            Feature::DebtToEquity,
            Feature::ReturnOnEquity,
            Feature::ProfitMargin,
            Feature::SentimentScore,
        ]
    );
    assert!(explanation
        .key_strengths
        .iter()
        .all(|e| e.impact_type == ImpactType::Positive && e.strength == Strength::High));

    let liquidity = &explanation.feature_impacts[&Feature::CurrentRatio];
    assert_eq!(liquidity.impact_type, ImpactType::Positive);
    assert_eq!(liquidity.strength, Strength::Medium);

    assert!(explanation.key_weaknesses.is_empty());
    assert!(explanation.recommendations.is_empty());
    assert!(explanation.summary.contains("low credit risk"));
}

#[test]
fn test_sample_data_trains_and_ranks() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let source = CachedSource::new(
        JsonCompanyStore::from_path(&sample_data_path()).unwrap(),
        TtlCache::new(Duration::seconds(600)),
    );
    let tickers: Vec<String> = DEFAULT_UNIVERSE
        .iter()
        .map(|(_, ticker)| ticker.to_string())
        .collect();

    let analyzer = SentimentAnalyzer::new();
    let mut companies = source.fetch_many(&tickers).unwrap();
    assert_eq!(companies.len(), DEFAULT_UNIVERSE.len());
    for company in companies.values_mut() {
        analyzer.enrich(company);
    }

    let mut predictor = ScorePredictor::new(GbmParams {
        n_estimators: 50,
        ..GbmParams::default()
    });
    let model = predictor.train(&companies).unwrap();
    assert_eq!(model.training_samples, DEFAULT_UNIVERSE.len());

    let pairs: Vec<(String, CompanyData)> = companies.into_iter().collect();
    let rows = compare_companies(&predictor, &pairs).unwrap();

    assert_eq!(rows.len(), pairs.len());
    assert!(rows
        .windows(2)
        .all(|w| w[0].credit_score >= w[1].credit_score));
    assert!(rows
        .iter()
        .all(|row| (0.0..=100.0).contains(&row.credit_score)));
}

#[test]
fn test_headlines_fill_missing_sentiment() {
    let store = JsonCompanyStore::from_path(&sample_data_path()).unwrap();
    let mut amazon = store.fetch("AMZN").unwrap().unwrap();
    assert!(amazon.metric("sentiment_score").is_none());
    assert_eq!(amazon.news.len(), 3);

    assert!(SentimentAnalyzer::new().enrich(&mut amazon));

    let score = amazon.metric("sentiment_score").unwrap();
    assert!((0.0..=100.0).contains(&score));
    assert!(amazon.news.iter().all(|item| item.sentiment.is_some()));
}

#[test]
fn test_missing_metrics_are_neutral_in_explanations() {
    let store = JsonCompanyStore::from_path(&sample_data_path()).unwrap();
    let bank = store.fetch("JPM").unwrap().unwrap();

    let features = FeatureVector::extract(&bank);
    assert_eq!(features.get(Feature::DebtToEquity), 0.0);

    let explanation = Explainer::new().explain(&bank, 60.0);
    let leverage = &explanation.feature_impacts[&Feature::DebtToEquity];
    assert_eq!(leverage.impact_type, ImpactType::Neutral);
    assert_eq!(explanation.risk_category.level, RiskLevel::Medium);
}
