use crate::engine::{AnalyzeRequest, FraudEngine};
use serde_json::json;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

/// Line-oriented JSON mode for local tooling and batch replay: one
/// `AnalyzeRequest` object per input line, one report (or error object)
/// per output line. Blank lines are skipped; malformed lines answer with
/// an error object.
pub async fn run_stdio(engine: FraudEngine) -> anyhow::Result<()> {
    let mut reader = BufReader::new(stdin()).lines();

    while let Some(line) = reader.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let request: AnalyzeRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(err) => {
                println!("{}", json!({ "error": format!("bad request: {err}") }));
                continue;
            }
        };

        match engine.analyze(&request) {
            Ok(report) => println!("{}", serde_json::to_string(&report)?),
            Err(err) => println!("{}", json!({ "error": err.to_string() })),
        }
    }

    Ok(())
}
