use std::time::Duration;

use olx_car_covers::fetcher::Fetcher;
use olx_car_covers::models::TransportKind;
use olx_car_covers::transport::{HttpTransport, PageTransport};
use olx_car_covers::AppError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

#[tokio::test]
async fn test_http_gives_up_after_max_attempts() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/q-car-cover"))
        .respond_with(ResponseTemplate::new(503))
        .expect(5)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(fast_fetch_config(5))?;
    let url = format!("{}/items/q-car-cover", server.uri());
    let err = transport.fetch(&url).await.unwrap_err();

    match err {
        AppError::RetriesExhausted { url: failed, attempts } => {
            assert_eq!(failed, url);
            assert_eq!(attempts, 5);
        }
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_http_recovers_after_server_errors() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(fast_fetch_config(5))?;
    let page = transport.fetch(&server.uri()).await?;

    assert_eq!(page.attempts, 3);
    assert!(page.text.contains("Premium Car Cover for Sedan"));
    Ok(())
}

#[tokio::test]
async fn test_http_retries_short_body() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(fast_fetch_config(3))?;
    let page = transport.fetch(&server.uri()).await?;

    assert_eq!(page.attempts, 2);
    assert_eq!(page.text, SEARCH_PAGE);
    Ok(())
}

#[tokio::test]
async fn test_http_returns_short_body_on_last_attempt() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("blocked"))
        .expect(2)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(fast_fetch_config(2))?;
    let page = transport.fetch(&server.uri()).await?;

    assert_eq!(page.text, "blocked");
    assert_eq!(page.attempts, 2);
    Ok(())
}

#[tokio::test]
async fn test_http_retries_timeouts() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SEARCH_PAGE)
                .set_delay(Duration::from_millis(1500)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut config = fast_fetch_config(2);
    config.connect_timeout_secs = 1;
    config.read_timeout_secs = 0;

    let transport = HttpTransport::new(config)?;
    let err = transport.fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, AppError::RetriesExhausted { attempts: 2, .. }));
    Ok(())
}

#[tokio::test]
async fn test_http_sends_browser_headers() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::header_exists("user-agent"))
        .and(wiremock::matchers::header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(fast_fetch_config(1))?;
    transport.fetch(&server.uri()).await?;
    Ok(())
}

#[tokio::test]
async fn test_fetcher_moves_to_next_candidate() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/q-car-cover"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cars/car-accessories/car-covers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let config = fast_fetch_config(2);
    let min_content_chars = config.min_content_chars;
    let fetcher = Fetcher::new(vec![Box::new(HttpTransport::new(config)?)], min_content_chars);

    let candidates = vec![
        format!("{}/items/q-car-cover", server.uri()),
        format!("{}/cars/car-accessories/car-covers", server.uri()),
    ];
    let result = fetcher.fetch_first(&candidates).await?;

    assert_eq!(result.url, candidates[1]);
    assert_eq!(result.transport_used, TransportKind::Http);
    assert_eq!(result.attempts, 1);
    assert!(result.body().contains("Maruti Swift Car Body Cover"));
    Ok(())
}

#[tokio::test]
async fn test_fetcher_rejects_thin_pages() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let thin = format!("<html><body>{}</body></html>", "x".repeat(400));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(thin))
        .mount(&server)
        .await;

    let config = fast_fetch_config(2);
    let min_content_chars = config.min_content_chars;
    let fetcher = Fetcher::new(vec![Box::new(HttpTransport::new(config)?)], min_content_chars);

    let candidates = vec![format!("{}/items/q-car-cover", server.uri())];
    match fetcher.fetch_first(&candidates).await {
        Err(AppError::FetchExhausted { tried }) => {
            assert_eq!(tried.len(), 1);
            assert!(tried[0].body.is_none());
        }
        other => panic!("expected exhausted fetch, got {:?}", other.map(|r| r.url)),
    }
    Ok(())
}
