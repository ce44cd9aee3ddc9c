use std::process::ExitCode;

use coin_alert::run;
use mockito::Server;

fn exit_code(code: ExitCode) -> String {
    format!("{code:?}")
}

#[tokio::test]
async fn only_options_exits_with_failure() {
    let code = run(["btc", "--x"]).await.unwrap();
    assert_eq!(exit_code(code), exit_code(ExitCode::FAILURE));
}

#[tokio::test]
async fn no_arguments_exits_with_failure() {
    let code = run(Vec::<String>::new()).await.unwrap();
    assert_eq!(exit_code(code), exit_code(ExitCode::FAILURE));
}

#[tokio::test]
async fn every_token_rejected_exits_with_failure() {
    let code = run(["eth30m5", "bitcoin", "--verbose"]).await.unwrap();
    assert_eq!(exit_code(code), exit_code(ExitCode::FAILURE));
}

#[tokio::test]
async fn failed_fetch_exits_with_failure() {
    let mut server = Server::new_async().await;
    let missing = server
        .mock("GET", "/ticker/nocoin/")
        .with_status(404)
        .with_body(r#"{"error": "id not found"}"#)
        .create_async()
        .await;

    std::env::set_var("SENDER", "alerts@example.com");
    std::env::set_var("RECIPIENT", "me@example.com");
    std::env::set_var("SECRET", "hunter2");
    std::env::set_var("TICKER_URL", format!("{}/ticker", server.url()));

    let code = run(["nocoin1h5"]).await.unwrap();
    missing.assert_async().await;
    assert_eq!(exit_code(code), exit_code(ExitCode::FAILURE));
}
