//! Console devices for running the terminal on a workstation.
//!
//! [`ConsoleRfid`] turns hex lines typed on a text stream (usually stdin)
//! into card presentations, and [`ConsoleIndicator`] reports output levels
//! through the log. Together they let the whole capture flow run against a
//! real directory and ledger without a radio or LEDs attached.

use crate::{
    HardwareError, Result,
    traits::{CardData, CardType, RfidDevice, SignalOutput},
    types::{DeviceInfo, ReaderInfo, SignalLine},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Reader fed by hex UIDs, one per line.
///
/// A background task parses the stream and queues each valid UID as a card
/// presentation. A presented card answers until halted; the next queued UID
/// is then picked up on the following poll. When the stream ends and the
/// queue is drained the reader reports itself disconnected.
#[derive(Debug)]
pub struct ConsoleRfid {
    event_rx: mpsc::Receiver<CardData>,
    current: Option<CardData>,
}

impl ConsoleRfid {
    /// Spawn a reader task over `input`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(input: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut lines = input.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let Some(card) = parse_line(&line) else {
                            continue;
                        };
                        if event_tx.send(card).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("Console input closed");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Console input failed");
                        break;
                    }
                }
            }
        });

        Self {
            event_rx,
            current: None,
        }
    }

    /// Spawn a reader over the process's standard input.
    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(tokio::io::stdin()))
    }
}

fn parse_line(line: &str) -> Option<CardData> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let uid = match hex::decode(line) {
        Ok(uid) => uid,
        Err(e) => {
            warn!(input = line, error = %e, "Ignoring console input");
            return None;
        }
    };

    match CardData::new(uid, CardType::MifareClassic1K) {
        Ok(card) => Some(card),
        Err(e) => {
            warn!(input = line, error = %e, "Ignoring console input");
            None
        }
    }
}

impl RfidDevice for ConsoleRfid {
    async fn is_new_card_present(&mut self) -> Result<bool> {
        if self.current.is_some() {
            return Ok(true);
        }

        match self.event_rx.try_recv() {
            Ok(card) => {
                self.current = Some(card);
                Ok(true)
            }
            Err(mpsc::error::TryRecvError::Empty) => Ok(false),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(HardwareError::disconnected("console input"))
            }
        }
    }

    async fn read_card(&mut self) -> Result<CardData> {
        self.current
            .clone()
            .ok_or_else(|| HardwareError::card_read("No card presented on console"))
    }

    async fn halt(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        Ok(ReaderInfo::new("Console Reader", vec!["hex-lines".to_string()]))
    }
}

/// Indicator that reports level changes through the log.
#[derive(Debug, Default)]
pub struct ConsoleIndicator;

impl ConsoleIndicator {
    pub fn new() -> Self {
        Self
    }
}

impl SignalOutput for ConsoleIndicator {
    async fn set_line(&mut self, line: SignalLine, high: bool) -> Result<()> {
        if high {
            info!(%line, color = line.color_name(), "Indicator on");
        } else {
            debug!(%line, color = line.color_name(), "Indicator off");
        }
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Console Indicator", "Log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("04ABCDEG")]
    #[case("04ABCDE")]
    #[case("04AB CDEF")]
    #[case("0x04ABCDEF")]
    fn test_parse_line_rejects_malformed_hex(#[case] input: &str) {
        assert!(parse_line(input).is_none());
    }

    #[test]
    fn test_parse_line_skips_noise() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("# comment").is_none());
        assert!(parse_line("not hex").is_none());
        assert!(parse_line("0102").is_none()); // shorter than a UID
    }

    #[test]
    fn test_parse_line_accepts_lowercase() {
        let card = parse_line(" 04abcdef ").unwrap();
        assert_eq!(card.uid, vec![0x04, 0xAB, 0xCD, 0xEF]);
    }

    #[tokio::test]
    async fn test_console_rfid_reads_lines_in_order() {
        let input: &[u8] = b"04ABCDEF\nbogus\n0A0B0C0D\n";
        let mut reader = ConsoleRfid::spawn(input);

        // Let the parser task drain the input.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        assert!(reader.is_new_card_present().await.unwrap());
        assert_eq!(reader.read_card().await.unwrap().uid_hex(), "04ABCDEF");
        // Still answering until halted.
        assert!(reader.is_new_card_present().await.unwrap());
        reader.halt().await.unwrap();

        assert!(reader.is_new_card_present().await.unwrap());
        assert_eq!(reader.read_card().await.unwrap().uid_hex(), "0A0B0C0D");
        reader.halt().await.unwrap();

        let err = reader.is_new_card_present().await.unwrap_err();
        assert!(matches!(err, HardwareError::Disconnected { .. }));
    }

    #[tokio::test]
    async fn test_console_indicator_accepts_levels() {
        let mut indicator = ConsoleIndicator::new();
        indicator.set_line(SignalLine::Success, true).await.unwrap();
        indicator.set_line(SignalLine::Success, false).await.unwrap();
        assert_eq!(indicator.get_info().await.unwrap().name, "Console Indicator");
    }
}
