use crate::events::AppEvent;
use async_channel::Sender;
use std::io::Write;
use std::os::unix::net::UnixStream;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/fortune-wheel.sock";

/// Parses one line of the control protocol: `spin`, `spin <index>` or `reload`.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let mut words = line.split_whitespace();
    let event = match (words.next()?, words.next()) {
        ("spin", None) => AppEvent::Spin(None),
        ("spin", Some(index)) => AppEvent::Spin(Some(index.parse().ok()?)),
        ("reload", None) => AppEvent::ConfigReload,
        _ => return None,
    };
    words.next().is_none().then_some(event)
}

pub fn format_command(event: &AppEvent) -> String {
    match event {
        AppEvent::Spin(None) => "spin".to_string(),
        AppEvent::Spin(Some(index)) => format!("spin {index}"),
        AppEvent::ConfigReload => "reload".to_string(),
    }
}

/// Sends one command to a running instance.
pub fn send_command(event: &AppEvent) -> std::io::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH)?;
    writeln!(stream, "{}", format_command(event))
}

pub async fn run_server(tx: Sender<AppEvent>) {
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::debug!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Some(event) => {
                                let _ = tx.send(event).await;
                            }
                            None => log::warn!("Unknown command: {:?}", line.trim()),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let cases = vec![
            ("spin", Some(AppEvent::Spin(None))),
            ("  spin 3 ", Some(AppEvent::Spin(Some(3)))),
            ("reload", Some(AppEvent::ConfigReload)),
            ("spin three", None),
            ("spin 1 2", None),
            ("show", None),
            ("", None),
        ];
        for (line, expected) in cases {
            assert_eq!(parse_command(line), expected, "line {line:?}");
        }
    }

    #[test]
    fn test_format_parses_back() {
        for event in [
            AppEvent::Spin(None),
            AppEvent::Spin(Some(7)),
            AppEvent::ConfigReload,
        ] {
            assert_eq!(parse_command(&format_command(&event)), Some(event));
        }
    }
}
