use std::path::Path;

use clap::error::ErrorKind;
use honeyscope_core::AppConfig;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

// -----------------------------------------------------------------------
// argument parsing
// -----------------------------------------------------------------------

#[test]
fn scrape_defaults_filename_to_data() {
    let cli = Cli::try_parse_from(["honeyscope-cli", "scrape"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Scrape { ref filename, allow_partial: false } if filename == "data"
    ));
}

#[test]
fn scrape_accepts_filename_and_allow_partial() {
    let cli = Cli::try_parse_from([
        "honeyscope-cli",
        "scrape",
        "--filename",
        "honey_march",
        "--allow-partial",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Scrape { ref filename, allow_partial: true } if filename == "honey_march"
    ));
}

#[test]
fn summarize_requires_database_and_collection() {
    assert!(Cli::try_parse_from(["honeyscope-cli", "summarize"]).is_err());
    assert!(
        Cli::try_parse_from(["honeyscope-cli", "summarize", "--database-name", "honey"]).is_err()
    );
}

#[test]
fn summarize_parses_names_and_optional_input() {
    let cli = Cli::try_parse_from([
        "honeyscope-cli",
        "summarize",
        "--database-name",
        "honey",
        "--collection-name",
        "insights",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Summarize { ref database_name, ref collection_name, input: None }
            if database_name == "honey" && collection_name == "insights"
    ));

    let cli = Cli::try_parse_from([
        "honeyscope-cli",
        "summarize",
        "--database-name",
        "honey",
        "--collection-name",
        "insights",
        "--input",
        "data/march.csv",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Summarize { input: Some(ref p), .. } if p == Path::new("data/march.csv")
    ));
}

#[test]
fn help_is_answered_by_the_parser() {
    let err = Cli::try_parse_from(["honeyscope-cli", "--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["honeyscope-cli"]).is_err());
}

// -----------------------------------------------------------------------
// scrape → CSV → summarize
// -----------------------------------------------------------------------

const COLLECTION_PATH: &str = "/collections/raw-honey";
const WIDGET_PATH: &str = "/reviews/reviews_for_widget";
const ANSWER: &str = r#"{"Positive": "Floral and thick.", "Negative": "NA", "Suggestion": "Sell larger jars.", "Score": 9}"#;

fn test_config(server: &MockServer, data_dir: &Path, openai_api_key: Option<&str>) -> AppConfig {
    AppConfig {
        log_level: "info".to_owned(),
        data_dir: data_dir.to_path_buf(),
        openai_api_key: openai_api_key.map(str::to_owned),
        mongodb_connection: None,
        store_url: server.uri(),
        collection_path: COLLECTION_PATH.to_owned(),
        reviews_widget_url: format!("{}{WIDGET_PATH}", server.uri()),
        shop_domain: "blebeehoney.myshopify.com".to_owned(),
        request_timeout_secs: 5,
        user_agent: "honeyscope-test/0.1".to_owned(),
        fetch_max_retries: 0,
        fetch_backoff_base_ms: 0,
        llm_api_base: format!("{}/v1", server.uri()),
        llm_model: "gpt-3.5-turbo".to_owned(),
        llm_max_retries: 0,
        llm_backoff_base_secs: 0,
    }
}

fn html(body: &'static str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn widget(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "html": format!(
            r#"<div class="jdgm-rev-widg__reviews"><div class="jdgm-rev">
                 <span class="jdgm-rev__timestamp jdgm-spinner" data-content="2023-05-01 09:00:00 UTC"></span>
                 <div class="jdgm-rev__content">
                   <b class="jdgm-rev__title">{title}</b>
                   <div class="jdgm-rev__body"><p>{body}</p></div>
                 </div>
               </div></div>"#
        )
    }))
}

async fn mount_storefront(server: &MockServer, litchi_status: u16) {
    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(html(include_str!(
            "../../honeyscope-scraper/tests/fixtures/collection.html"
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/raw-forest-honey"))
        .respond_with(html(include_str!(
            "../../honeyscope-scraper/tests/fixtures/product_raw_forest.html"
        )))
        .mount(server)
        .await;
    let litchi = if litchi_status == 200 {
        html(include_str!(
            "../../honeyscope-scraper/tests/fixtures/product_litchi.html"
        ))
    } else {
        ResponseTemplate::new(litchi_status)
    };
    Mock::given(method("GET"))
        .and(path("/products/litchi-honey"))
        .respond_with(litchi)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(WIDGET_PATH))
        .and(query_param("product_id", "101"))
        .respond_with(widget("Pure", "Thick and aromatic"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(WIDGET_PATH))
        .and(query_param("product_id", "102"))
        .respond_with(widget("Sweet", "Lovely floral notes"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scrape_then_summarize_yields_one_document_per_product() {
    let server = MockServer::start().await;
    mount_storefront(&server, 200).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": ANSWER}}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&server, tmp.path(), Some("test-key"));

    let csv_path = scrape::run_scrape(&config, "data", false).await.unwrap();
    assert_eq!(csv_path, tmp.path().join("data.csv"));

    let summarizer = summarize::build_summarizer(&config).unwrap();
    let docs = summarize::summarize_artifact(&config, &summarizer, None)
        .await
        .unwrap();

    let names: Vec<&str> = docs.iter().map(|d| d.product_name.as_str()).collect();
    assert_eq!(names, vec!["Raw Forest Honey", "Litchi Honey"]);
    assert!(docs.iter().all(|d| d.review_count == 1));
    assert_eq!(docs[0].suggestion(), Some("Sell larger jars."));
}

#[tokio::test]
async fn partial_scrape_is_rejected_without_flag() {
    let server = MockServer::start().await;
    mount_storefront(&server, 404).await;

    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&server, tmp.path(), None);

    let err = scrape::run_scrape(&config, "data", false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--allow-partial"), "got: {err}");
    assert!(!tmp.path().join("data.csv").exists());
}

#[tokio::test]
async fn partial_scrape_is_written_with_flag() {
    let server = MockServer::start().await;
    mount_storefront(&server, 404).await;

    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&server, tmp.path(), None);

    let path = scrape::run_scrape(&config, "partial", true).await.unwrap();
    let rows = honeyscope_scraper::read_products_csv(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Raw Forest Honey");
}

#[tokio::test]
async fn summarizer_needs_api_key() {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&server, tmp.path(), None);

    let err = summarize::build_summarizer(&config).unwrap_err();
    assert!(err.to_string().contains("OPENAI_API_KEY"), "got: {err}");
}

#[tokio::test]
async fn summarize_without_artifact_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&server, tmp.path(), Some("test-key"));
    let summarizer = summarize::build_summarizer(&config).unwrap();

    let result = summarize::summarize_artifact(&config, &summarizer, None).await;
    assert!(result.is_err());
}

fn write_artifact(dir: &Path) {
    let rows = vec![honeyscope_core::ProductRow {
        name: "Acacia Honey".to_owned(),
        image_url: "https://cdn.shopify.com/acacia.jpg".to_owned(),
        product_url: "https://www.scrollingbee.com/products/acacia".to_owned(),
        price: "550".parse().unwrap(),
        rating: 4.0,
        review_count: 1,
        reviews: vec![honeyscope_core::Review {
            text: "Light and clear".to_owned(),
            date: None,
        }],
    }];
    honeyscope_scraper::write_products_csv(dir, "data", &rows).unwrap();
}

#[tokio::test]
async fn run_summarize_needs_mongodb_connection_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    write_artifact(tmp.path());
    let config = test_config(&server, tmp.path(), Some("test-key"));

    let err = summarize::run_summarize(&config, "honey", "insights", None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("MONGODB_CONNECTION"), "got: {err}");
}

#[tokio::test]
async fn run_summarize_persists_only_after_every_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": ANSWER}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    write_artifact(tmp.path());
    let mut config = test_config(&server, tmp.path(), Some("test-key"));
    config.mongodb_connection =
        Some("mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=200&connectTimeoutMS=200".to_owned());

    // The summary is produced, then the insert fails against the closed port.
    let err = summarize::run_summarize(&config, "honey", "insights", None)
        .await
        .unwrap_err();
    assert!(
        err.downcast_ref::<honeyscope_db::StoreError>().is_some(),
        "expected a store error, got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_summary_never_reaches_the_database() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "not json"}}]
        })))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    write_artifact(tmp.path());
    let mut config = test_config(&server, tmp.path(), Some("test-key"));
    config.mongodb_connection =
        Some("mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=200&connectTimeoutMS=200".to_owned());

    let err = summarize::run_summarize(&config, "honey", "insights", None)
        .await
        .unwrap_err();
    assert!(
        err.downcast_ref::<honeyscope_summarizer::SummarizerError>().is_some(),
        "expected a summarizer error, got: {err:?}"
    );
}
