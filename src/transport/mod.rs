//! Line-delimited JSON transport.
//!
//! Each input line is a request `{"id": .., "method": "..", "params": {..}}`
//! and produces exactly one response line `{"id": .., "result": ..}`.
//! Requests run concurrently, so responses may arrive out of order; callers
//! match them by `id`.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::application::{AppError, Envelope, LedgerService};
use crate::domain::{DEFAULT_CATEGORIES, ExpenseId};

/// Requests handled at once; further input waits for a slot.
pub const MAX_IN_FLIGHT: usize = 32;

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub id: Value,
    pub result: Value,
}

#[derive(Debug, Deserialize)]
struct AddExpenseParams {
    date: String,
    amount: f64,
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RangeParams {
    start_date: String,
    end_date: String,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    #[serde(alias = "id")]
    expense_id: ExpenseId,
}

/// Run one operation and return its JSON result.
pub async fn dispatch(service: &LedgerService, method: &str, params: Value) -> Value {
    debug!("dispatch {}", method);
    match method {
        "add_expense" => match parse_params::<AddExpenseParams>(params) {
            Ok(p) => service
                .add_expense(
                    &p.date,
                    p.amount,
                    &p.category,
                    p.subcategory.as_deref(),
                    p.note.as_deref(),
                )
                .await
                .to_json(),
            Err(err) => rejected(err),
        },
        "list_expenses" => match parse_params::<RangeParams>(params) {
            Ok(p) => service
                .list_expenses(&p.start_date, &p.end_date)
                .await
                .to_json(),
            Err(err) => rejected(err),
        },
        "summarize_expenses" => match parse_params::<RangeParams>(params) {
            Ok(p) => service
                .summarize_expenses(&p.start_date, &p.end_date, p.category.as_deref())
                .await
                .to_json(),
            Err(err) => rejected(err),
        },
        "delete_expense" => match parse_params::<DeleteParams>(params) {
            Ok(p) => service.delete_expense(p.expense_id).await.to_json(),
            Err(err) => rejected(err),
        },
        "get_categories" => {
            serde_json::to_value(service.category_set())
                .unwrap_or_else(|_| json!({ "categories": DEFAULT_CATEGORIES }))
        }
        other => rejected(AppError::InvalidRequest(format!("unknown method '{}'", other))),
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, AppError> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| AppError::InvalidRequest(e.to_string()))
}

fn rejected(err: AppError) -> Value {
    Envelope::<()>::from_result(Err(err)).to_json()
}

/// Handle a single request line and render the response line.
pub async fn handle_line(service: &LedgerService, line: &str) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => Response {
            id: request.id,
            result: dispatch(service, &request.method, request.params).await,
        },
        Err(err) => Response {
            id: Value::Null,
            result: rejected(AppError::InvalidRequest(format!("malformed request: {}", err))),
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|err| {
        format!(
            r#"{{"id":null,"result":{{"status":"error","kind":"storage","message":"{}"}}}}"#,
            err
        )
    })
}

/// Serve requests from `reader` until EOF, writing responses to `writer`.
///
/// Returns the writer once every in-flight request has been answered.
pub async fn serve<R, W>(service: Arc<LedgerService>, reader: R, writer: W) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<_, std::io::Error>(writer)
    });

    let mut lines = reader.lines();
    let mut tasks = JoinSet::new();
    let in_flight = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
    let mut handled = 0usize;

    loop {
        tokio::select! {
            // Reap finished requests as they complete so the set stays small.
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                joined.context("Request task panicked")?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read request")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                handled += 1;
                let permit = Arc::clone(&in_flight)
                    .acquire_owned()
                    .await
                    .context("Request limiter closed")?;
                let service = Arc::clone(&service);
                let tx = tx.clone();
                tasks.spawn(async move {
                    let response = handle_line(&service, &line).await;
                    // The receiver only goes away if the writer failed; that error surfaces below.
                    let _ = tx.send(response);
                    drop(permit);
                });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        joined.context("Request task panicked")?;
    }
    drop(tx);

    let writer = writer_task
        .await
        .context("Response writer panicked")?
        .context("Failed to write response")?;

    info!("Input closed after {} request(s)", handled);
    Ok(writer)
}
