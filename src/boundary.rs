// src/boundary.rs

//! Request boundary: a thin JSON-lines codec over stdin/stdout.
//!
//! Each request is one line, a `{"op": ..., ...}` document; each response is
//! one structured document with named fields. Requests are dispatched onto
//! their own tasks so a blocking operation (`start_run` holds its request
//! open for the whole simulation) never freezes status polls or a stop
//! request; responses are therefore written in completion order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::store::{FileKind, TEMPLATE_SOURCE};
use crate::Orchestrator;

/// One decoded request.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    ListScenarios,
    CloneSources,
    NewScenario {
        name: String,
        from: String,
    },
    DeleteScenario {
        name: String,
    },
    ListFiles {
        name: String,
        kind: FileKind,
    },
    OutputsDirectory {
        name: String,
    },
    LoadTextFile {
        name: String,
        kind: FileKind,
        file: String,
    },
    SaveTextFile {
        name: String,
        kind: FileKind,
        file: String,
        data: Vec<Vec<String>>,
    },
    LoadCsvFile {
        name: String,
        kind: FileKind,
        file: String,
    },
    SaveCsvFile {
        name: String,
        kind: FileKind,
        file: String,
        data: Vec<Vec<String>>,
    },
    ReportSettings,
    GetDefaultState,
    SetDefaultState {
        state: Vec<String>,
    },
    RunStatus,
    ResetRunStatus,
    StartRun {
        name: String,
    },
    StopRun,
    RunReports {
        scenarios: Vec<String>,
        metrics: Vec<String>,
        measures: Vec<String>,
    },
    Exit,
}

/// One response document. Serialized as its bare fields, matching the shape
/// callers expect per operation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Scenarios {
        scenarios: Vec<String>,
    },
    CloneSources {
        root_scenarios: Vec<String>,
        scenarios: Vec<String>,
    },
    Success {
        success: bool,
    },
    Files {
        files: Vec<String>,
    },
    FilesWithDirectory {
        files: Vec<String>,
        directory: String,
    },
    Rows {
        data: Vec<Vec<String>>,
    },
    State {
        state: Option<Vec<String>>,
    },
    Status {
        output: String,
    },
    Pid {
        pid: u32,
    },
    Reports {
        scenarios: Vec<String>,
        metrics: Vec<String>,
        images: Vec<String>,
    },
}

/// Forward one request to the core and build its response document.
///
/// A duplicate-name create is a structured `success: false`, not an error;
/// everything the error taxonomy calls fatal propagates as `Err` for the
/// caller to encode.
pub async fn dispatch(orch: &Orchestrator, request: Request) -> Result<Response> {
    match request {
        Request::ListScenarios => Ok(Response::Scenarios {
            scenarios: orch.store.list_scenarios()?,
        }),

        Request::CloneSources => {
            let sources = orch.store.clone_sources()?;
            Ok(Response::CloneSources {
                root_scenarios: sources.root_scenarios,
                scenarios: sources.scenarios,
            })
        }

        Request::NewScenario { name, from } => {
            let from_template = from == TEMPLATE_SOURCE;
            let created = orch.store.create_scenario(&name, &from, from_template)?;
            Ok(Response::Success { success: created })
        }

        Request::DeleteScenario { name } => {
            orch.store.delete_scenario(&name)?;
            Ok(Response::Success { success: true })
        }

        Request::ListFiles { name, kind } => Ok(Response::Files {
            files: orch.store.list_files(&name, kind)?,
        }),

        Request::OutputsDirectory { name } => {
            let (files, directory) = orch.store.outputs_directory(&name)?;
            Ok(Response::FilesWithDirectory {
                files,
                directory: directory.to_string_lossy().to_string(),
            })
        }

        Request::LoadTextFile { name, kind, file } => {
            let lines = orch.store.read_lines(&name, kind, &file)?;
            Ok(Response::Rows {
                data: lines.into_iter().map(|l| vec![l]).collect(),
            })
        }

        Request::SaveTextFile {
            name,
            kind,
            file,
            data,
        } => {
            let lines: Vec<String> = data.into_iter().filter_map(|mut r| {
                if r.is_empty() { None } else { Some(r.remove(0)) }
            }).collect();
            orch.store.write_lines(&name, kind, &file, &lines)?;
            Ok(Response::Success { success: true })
        }

        Request::LoadCsvFile { name, kind, file } => Ok(Response::Rows {
            data: orch.store.read_rows(&name, kind, &file)?,
        }),

        Request::SaveCsvFile {
            name,
            kind,
            file,
            data,
        } => {
            orch.store.write_rows(&name, kind, &file, &data)?;
            Ok(Response::Success { success: true })
        }

        Request::ReportSettings => Ok(Response::Rows {
            data: orch.store.read_report_settings()?,
        }),

        Request::GetDefaultState => Ok(Response::State {
            state: orch.store.read_default_state()?,
        }),

        Request::SetDefaultState { state } => {
            orch.store.write_default_state(&state)?;
            Ok(Response::Success { success: true })
        }

        Request::RunStatus => Ok(Response::Status {
            output: orch.runner.status(),
        }),

        Request::ResetRunStatus => {
            orch.runner.reset_status()?;
            Ok(Response::Success { success: true })
        }

        Request::StartRun { name } => Ok(Response::Pid {
            pid: orch.runner.start(&name).await?,
        }),

        Request::StopRun => {
            orch.runner.stop().await?;
            Ok(Response::Success { success: true })
        }

        Request::RunReports {
            scenarios,
            metrics,
            measures,
        } => {
            let batch = orch.reports.run_reports(&scenarios, &metrics, &measures).await?;
            Ok(Response::Reports {
                scenarios: batch.scenarios,
                metrics: batch.metrics,
                images: batch.images,
            })
        }

        Request::Exit => Ok(Response::Success { success: true }),
    }
}

/// Serve JSON-lines requests from stdin until EOF, `exit`, or Ctrl-C.
pub async fn serve_stdio(orch: Arc<Orchestrator>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let (out_tx, mut out_rx) = mpsc::channel::<String>(64);
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(doc) = out_rx.recv().await {
            let _ = stdout.write_all(doc.as_bytes()).await;
            let _ = stdout.write_all(b"\n").await;
            let _ = stdout.flush().await;
        }
    });

    info!("boundary serving on stdio");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received; shutting down");
                break;
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed; shutting down");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match serde_json::from_str::<Request>(&line) {
                    Err(err) => {
                        warn!(error = %err, "undecodable request");
                        let _ = out_tx.send(error_document(&err.to_string())).await;
                    }
                    Ok(Request::Exit) => {
                        let _ = out_tx.send(encode(&Response::Success { success: true })).await;
                        info!("exit requested; shutting down");
                        break;
                    }
                    Ok(request) => {
                        debug!(?request, "request received");
                        let orch = Arc::clone(&orch);
                        let tx = out_tx.clone();
                        tokio::spawn(async move {
                            let doc = match dispatch(&orch, request).await {
                                Ok(response) => encode(&response),
                                Err(err) => error_document(&err.to_string()),
                            };
                            let _ = tx.send(doc).await;
                        });
                    }
                }
            }
        }
    }

    // In-flight requests (a blocked `start_run` in particular) may still hold
    // sender clones; give quick responses a moment to flush, then leave.
    drop(out_tx);
    let _ = tokio::time::timeout(std::time::Duration::from_millis(200), printer).await;
    Ok(())
}

fn encode(response: &Response) -> String {
    serde_json::to_string(response)
        .unwrap_or_else(|err| error_document(&format!("response encoding failed: {err}")))
}

fn error_document(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
