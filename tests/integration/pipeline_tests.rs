use olx_car_covers::models::TransportKind;
use olx_car_covers::{run_once, OutputFormat, RunContext, RunOutcome, NOT_AVAILABLE};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const PRIMARY: &str = "/items/q-car-cover";
const FALLBACK: &str = "/cars/car-accessories/car-covers";

#[tokio::test]
async fn test_full_run_writes_all_formats() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRIMARY))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server.uri(), &[PRIMARY, FALLBACK], dir.path());
    let context = RunContext::open(config)?;
    let outcome = context.run(&OutputFormat::ALL).await;
    context.shutdown();

    let (source_url, transport, records, files) = match outcome {
        RunOutcome::Completed {
            source_url,
            transport,
            records,
            files,
        } => (source_url, transport, records, files),
        other => panic!("expected a completed run, got {:?}", other),
    };

    assert_eq!(source_url, format!("{}{}", server.uri(), PRIMARY));
    assert_eq!(transport, TransportKind::Http);

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Premium Car Cover for Sedan",
            "Maruti Swift Car Body Cover - triple stitched",
            "Heavy duty VEHICLE COVER for SUV",
        ]
    );

    let first = records.iter().next().unwrap();
    assert_eq!(first.price, "₹ 499");
    assert_eq!(first.location, "Koramangala, Bengaluru");
    assert_eq!(first.link, "https://www.olx.in/item/car-cover-waterproof-for-sedan-iid-1780001");
    assert_eq!(first.posted_date, "Today");

    let last = records.iter().last().unwrap();
    assert_eq!(last.link, NOT_AVAILABLE);
    assert_eq!(last.price, NOT_AVAILABLE);

    assert_eq!(files.len(), 3);
    for file in &files {
        assert!(file.exists(), "missing {}", file.display());
    }
    println!("✓ Wrote {} result files", files.len());

    let document: Value = serde_json::from_str(&std::fs::read_to_string(&files[0])?)?;
    assert_eq!(document["search_query"], "Car Cover");
    assert_eq!(document["search_url"], source_url.as_str());
    assert_eq!(document["total_results"], 3);
    assert_eq!(document["results"][1]["price"], "₹ 850");

    let mut reader = csv::Reader::from_path(&files[1])?;
    assert_eq!(reader.records().count(), 3);

    let report = std::fs::read_to_string(&files[2])?;
    assert!(report.contains("Total Results: 3"));
    assert!(report.contains("Listing 3:"));

    Ok(())
}

#[tokio::test]
async fn test_run_falls_back_to_second_candidate() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRIMARY))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FALLBACK))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server.uri(), &[PRIMARY, FALLBACK], dir.path());
    let outcome = run_once(config, &[OutputFormat::Json]).await?;

    match outcome {
        RunOutcome::Completed {
            source_url, files, ..
        } => {
            assert!(source_url.ends_with(FALLBACK));
            assert_eq!(files, vec![dir.path().join("olx_car_cover_results.json")]);
        }
        other => panic!("expected a completed run, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_no_matches_is_reported_not_raised() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let page = listing_page(&[
        "iPhone 12 128GB",
        "Honda Activa 2019",
        "Study table",
        "Alloy wheels",
        "Sofa set",
        "Cricket kit",
    ]);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server.uri(), &[PRIMARY], dir.path());
    let outcome = run_once(config, &OutputFormat::ALL).await?;
    assert_eq!(outcome.record_count(), 0);

    match outcome {
        RunOutcome::NoMatches {
            blocks_seen,
            sample_titles,
            files,
            ..
        } => {
            assert_eq!(blocks_seen, 6);
            assert_eq!(
                sample_titles,
                vec!["iPhone 12 128GB", "Honda Activa 2019", "Study table", "Alloy wheels", "Sofa set"]
            );
            assert!(files.is_empty());
        }
        other => panic!("expected no matches, got {:?}", other),
    }

    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_no_matches_can_still_write_json() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["Bike helmet"])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let mut config = get_test_config(&server.uri(), &[PRIMARY], dir.path());
    config.output.write_empty_json = true;

    let outcome = run_once(config, &OutputFormat::ALL).await?;
    let files = match outcome {
        RunOutcome::NoMatches { files, .. } => files,
        other => panic!("expected no matches, got {:?}", other),
    };

    assert_eq!(files.len(), 1);
    let document: Value = serde_json::from_str(&std::fs::read_to_string(&files[0])?)?;
    assert_eq!(document["total_results"], 0);
    assert_eq!(document["results"], Value::Array(Vec::new()));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_site_writes_nothing() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(6)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server.uri(), &[PRIMARY, FALLBACK], dir.path());
    let outcome = run_once(config, &OutputFormat::ALL).await?;

    match outcome {
        RunOutcome::NoContent { tried } => {
            assert_eq!(tried.len(), 2);
            assert!(tried.iter().all(|t| t.transport_used == TransportKind::Http));
            assert!(tried.iter().all(|t| t.attempts == 3));
        }
        other => panic!("expected no content, got {:?}", other),
    }

    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}
