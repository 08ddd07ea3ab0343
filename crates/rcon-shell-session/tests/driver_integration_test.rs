//! Integration tests for the session drivers over the scripted transport.

use std::sync::Arc;
use std::time::Duration;

use rcon_shell_core::{ConnectionConfig, Error, SessionState};
use rcon_shell_session::testing::MockDialer;
use rcon_shell_session::{run_once, ChannelDriver, InteractiveDriver, Session};
use tokio::sync::mpsc;

fn config() -> ConnectionConfig {
    ConnectionConfig::new("play.example.net", 25575, "secret")
}

async fn start(dialer: &MockDialer) -> Session {
    Session::start(config(), Arc::new(dialer.clone()))
        .await
        .expect("session should connect")
}

#[tokio::test]
async fn test_interactive_session_transcript() {
    let dialer = MockDialer::new();
    dialer
        .respond("There are 1 of a max of 20 players online: alex")
        .respond("");

    let mut output = Vec::new();
    let input = "list\n\nsave-all\nstop\nlist\n";
    let result = InteractiveDriver::new(start(&dialer).await, input.as_bytes(), &mut output)
        .run()
        .await;

    assert!(result.is_ok());
    // Everything after `stop` is ignored.
    assert_eq!(dialer.sent(), vec!["list", "save-all"]);
    assert_eq!(dialer.closes(), 1);

    let output = String::from_utf8(output).unwrap();
    assert!(output.starts_with("rcon@play.example.net:25575> "));
    assert!(output.contains("alex\n"));
}

#[tokio::test(start_paused = true)]
async fn test_interactive_survives_server_restart() {
    let dialer = MockDialer::new();
    dialer
        .accept_dial()
        .refuse_dial("restarting")
        .accept_dial();
    dialer.fail(Error::ConnectionClosed).respond("back online");

    let mut output = Vec::new();
    let result = InteractiveDriver::new(start(&dialer).await, &b"list\nlist\n"[..], &mut output)
        .run()
        .await;

    assert!(result.is_ok());
    assert_eq!(dialer.dials(), 3);
    assert_eq!(dialer.peak_open(), 1);
    assert!(String::from_utf8(output).unwrap().contains("back online"));
}

#[tokio::test]
async fn test_channel_driver_in_background_task() {
    let dialer = MockDialer::new();
    dialer.respond("Done").respond("");

    let (command_tx, command_rx) = mpsc::channel(4);
    let (result_tx, mut result_rx) = mpsc::channel(1);
    let driver = ChannelDriver::new(start(&dialer).await, command_rx, result_tx);
    let handle = tokio::spawn(driver.run());

    command_tx.send("weather clear".to_string()).await.unwrap();
    command_tx.send("say hi".to_string()).await.unwrap();

    // The result queue holds one message; the driver waits for us.
    let mut messages = Vec::new();
    for _ in 0..5 {
        messages.push(result_rx.recv().await.unwrap());
    }
    command_tx.send(String::new()).await.unwrap();

    assert!(handle.await.unwrap().is_ok());
    assert_eq!(
        messages,
        vec![
            "command \"weather clear\" sent",
            "Done",
            "command \"say hi\" sent",
            "",
            "response is empty",
        ]
    );
    assert_eq!(dialer.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_exhaustion_is_terminal() {
    let dialer = MockDialer::new();
    dialer
        .accept_dial()
        .refuse_dial("refused")
        .refuse_dial("refused")
        .refuse_dial("refused");
    dialer.fail(Error::ConnectionClosed);

    let mut session = start(&dialer).await;
    let started = tokio::time::Instant::now();

    let err = session.send_command("list").await.unwrap_err();

    assert!(matches!(err, Error::Connect { .. }));
    assert_eq!(session.state(), SessionState::Terminated);
    assert!(started.elapsed() >= Duration::from_secs(15));

    let dials = dialer.dials();
    assert!(matches!(
        session.send_command("list").await,
        Err(Error::SessionTerminated)
    ));
    assert_eq!(dialer.dials(), dials);
    assert_eq!(dialer.sent(), vec!["list"]);
}

#[tokio::test]
async fn test_single_shot() {
    let dialer = MockDialer::new();
    dialer.respond("Teleported alex to 0, 64, 0");

    let result = run_once(Arc::new(dialer.clone()), config(), "tp alex 0 64 0")
        .await
        .unwrap();

    assert_eq!(result.text, "Teleported alex to 0, 64, 0");
    assert_eq!(dialer.open(), 0);
}
