use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use ulid::Ulid;

use crate::authoring::{AuthoringWorkflow, GroupField, TaskField};
use crate::cli::group::{fill, GroupInput};
use crate::config::Config;
use crate::error::{ErrorCode, TaskdeskError};
use crate::models::{Task, TaskGroup, TaskGroupStatus, TaskGroupTask};
use crate::notify::ManualClock;
use crate::output;
use crate::store::workspace::today;
use crate::store::Workspace;

/// One line of a session script.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Missing `id`, `createdBy` and `createdOn` are filled in.
    AddTask(Value),
    UpdateTask(Task),
    DeleteTask { id: String },
    AddTaskGroup(Value),
    UpdateTaskGroup(TaskGroup),
    SetStatus { id: String, status: TaskGroupStatus },
    DeleteTaskGroup { id: String },
    /// Without `tasks`, the group's own embedded tasks are used.
    AddTasksFromGroup {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(default)]
        tasks: Option<Vec<Value>>,
    },
    DraftOpen,
    DraftSet { field: GroupField, value: String },
    DraftTaskSet { field: TaskField, value: String },
    DraftToggleStep { step: String },
    DraftAddTask,
    DraftRemoveTask { id: Ulid },
    DraftSubmit,
    DraftCancel,
    /// Fill and submit a whole group document in one go.
    DraftLoad(Value),
    Advance { secs: u64 },
    Snapshot,
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::AddTask(_) => "add_task",
            Op::UpdateTask(_) => "update_task",
            Op::DeleteTask { .. } => "delete_task",
            Op::AddTaskGroup(_) => "add_task_group",
            Op::UpdateTaskGroup(_) => "update_task_group",
            Op::SetStatus { .. } => "set_status",
            Op::DeleteTaskGroup { .. } => "delete_task_group",
            Op::AddTasksFromGroup { .. } => "add_tasks_from_group",
            Op::DraftOpen => "draft_open",
            Op::DraftSet { .. } => "draft_set",
            Op::DraftTaskSet { .. } => "draft_task_set",
            Op::DraftToggleStep { .. } => "draft_toggle_step",
            Op::DraftAddTask => "draft_add_task",
            Op::DraftRemoveTask { .. } => "draft_remove_task",
            Op::DraftSubmit => "draft_submit",
            Op::DraftCancel => "draft_cancel",
            Op::DraftLoad(_) => "draft_load",
            Op::Advance { .. } => "advance",
            Op::Snapshot => "snapshot",
        }
    }

    fn touches_draft(&self) -> bool {
        self.name().starts_with("draft_")
    }
}

/// A workspace, an authoring form, and a clock that moves only on `advance`.
pub struct Session {
    clock: Arc<ManualClock>,
    ws: Workspace,
    draft: AuthoringWorkflow,
}

fn with_default<F>(value: &mut Value, key: &str, default: F) -> Result<(), TaskdeskError>
where
    F: FnOnce() -> Result<String, TaskdeskError>,
{
    if let Value::Object(map) = value {
        let missing = match map.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            map.insert(key.to_string(), Value::String(default()?));
        }
    }
    Ok(())
}

fn fresh_ulid() -> Result<String, TaskdeskError> {
    Ok(Ulid::new().to_string())
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T, TaskdeskError> {
    serde_json::from_value(value)
        .map_err(|e| TaskdeskError::validation(format!("Invalid {what}: {e}")))
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let clock = Arc::new(ManualClock::new());
        let ws = Workspace::new(config, clock.clone());
        Self {
            clock,
            ws,
            draft: AuthoringWorkflow::new(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.ws
    }

    pub fn draft(&self) -> &AuthoringWorkflow {
        &self.draft
    }

    fn draft_state(&self) -> Value {
        json!({
            "phase": self.draft.phase().as_str(),
            "staged": self.draft.staged_tasks().len(),
            "errors": output::json::to_value(self.draft.errors())
        })
    }

    pub fn apply(&mut self, op: Op) -> Result<Value, TaskdeskError> {
        match op {
            Op::AddTask(mut raw) => {
                let operator = self.ws.operator().to_string();
                with_default(&mut raw, "id", || self.ws.next_task_id())?;
                with_default(&mut raw, "createdBy", || Ok(operator))?;
                with_default(&mut raw, "createdOn", || Ok(today()))?;
                let task: Task = decode(raw, "task")?;
                if task.name.trim().is_empty() {
                    return Err(TaskdeskError::validation("Task name is required"));
                }
                self.ws.add_task(task.clone());
                Ok(json!({ "task": task }))
            }
            Op::UpdateTask(task) => Ok(json!({ "matched": self.ws.update_task(task) })),
            Op::DeleteTask { id } => Ok(json!({ "removed": self.ws.delete_task(&id) })),
            Op::AddTaskGroup(mut raw) => {
                let operator = self.ws.operator().to_string();
                with_default(&mut raw, "id", || self.ws.next_task_group_id())?;
                with_default(&mut raw, "createdBy", || Ok(operator))?;
                with_default(&mut raw, "createdOn", || Ok(today()))?;
                with_default(&mut raw, "status", || {
                    Ok(TaskGroupStatus::Planned.as_str().to_string())
                })?;
                if let Some(Value::Array(tasks)) = raw.get_mut("tasks") {
                    for t in tasks.iter_mut() {
                        with_default(t, "id", fresh_ulid)?;
                    }
                }
                let mut group: TaskGroup = decode(raw, "task group")?;
                if group.number_of_tasks.is_empty() {
                    group.number_of_tasks = group.tasks.len().to_string();
                }
                self.ws.add_task_group(group.clone());
                Ok(json!({ "taskGroup": group }))
            }
            Op::UpdateTaskGroup(group) => {
                Ok(json!({ "matched": self.ws.update_task_group(group) }))
            }
            Op::SetStatus { id, status } => {
                Ok(json!({ "matched": self.ws.set_task_group_status(&id, status)? }))
            }
            Op::DeleteTaskGroup { id } => Ok(json!({ "removed": self.ws.delete_task_group(&id) })),
            Op::AddTasksFromGroup { group_id, tasks } => {
                let group_tasks: Vec<TaskGroupTask> = match tasks {
                    Some(raw) => raw
                        .into_iter()
                        .map(|mut t| {
                            with_default(&mut t, "id", fresh_ulid)?;
                            decode(t, "task group task")
                        })
                        .collect::<Result<Vec<TaskGroupTask>, TaskdeskError>>()?,
                    None => self
                        .ws
                        .find_task_group(&group_id)
                        .map(|g| g.tasks.clone())
                        .unwrap_or_default(),
                };
                let created = self.ws.add_tasks_from_task_group(&group_id, &group_tasks)?;
                Ok(json!({ "tasks": created }))
            }
            Op::DraftOpen => {
                self.draft.open();
                Ok(self.draft_state())
            }
            Op::DraftSet { field, value } => {
                self.draft.set_group_field(field, value);
                Ok(self.draft_state())
            }
            Op::DraftTaskSet { field, value } => {
                self.draft.set_task_field(field, value);
                Ok(self.draft_state())
            }
            Op::DraftToggleStep { step } => {
                let selected = self.draft.toggle_dependent_step(&step);
                let mut state = self.draft_state();
                state["selected"] = json!(selected);
                Ok(state)
            }
            Op::DraftAddTask => {
                let staged = self.draft.add_task()?.clone();
                let mut state = self.draft_state();
                state["task"] = output::json::to_value(&staged);
                Ok(state)
            }
            Op::DraftRemoveTask { id } => {
                let removed = self.draft.remove_task(id)?;
                let mut state = self.draft_state();
                state["removed"] = json!(removed);
                Ok(state)
            }
            Op::DraftSubmit => {
                let submission = self.draft.submit(&mut self.ws)?;
                Ok(output::json::to_value(&submission))
            }
            Op::DraftCancel => {
                self.draft.cancel();
                Ok(self.draft_state())
            }
            Op::DraftLoad(raw) => {
                let input: GroupInput = decode(raw, "task group document")?;
                self.draft.cancel();
                fill(&mut self.draft, input)?;
                let submission = self.draft.submit(&mut self.ws)?;
                Ok(output::json::to_value(&submission))
            }
            Op::Advance { secs } => {
                if !self.clock.advance(Duration::from_secs(secs)) {
                    return Err(TaskdeskError::new(
                        ErrorCode::ScriptError,
                        format!("cannot advance the clock by {secs}s"),
                    ));
                }
                let cleared = self.ws.poll_notifications();
                let group_notice = self.ws.show_task_group_created_notification();
                Ok(json!({
                    "elapsedSecs": self.clock.elapsed().as_secs(),
                    "cleared": cleared,
                    "showTaskCreatedNotification": self.ws.show_task_created_notification(),
                    "showTaskGroupCreatedNotification": group_notice
                }))
            }
            Op::Snapshot => Ok(output::json::to_value(&self.ws.snapshot())),
        }
    }
}

pub fn parse_line(lineno: usize, line: &str) -> Result<Option<Op>, TaskdeskError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| TaskdeskError::script(lineno, e.to_string()))
}

pub fn run(file: Option<&Path>, config: &Config, json_output: bool) -> i32 {
    let script = match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| TaskdeskError::io(format!("Cannot read {}: {e}", path.display()))),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).map(|_| input).map_err(TaskdeskError::from)
        }
    };
    let script = match script {
        Ok(s) => s,
        Err(e) => return super::finish(Err(e), json_output),
    };

    let mut session = Session::new(config);
    let mut failed = 0usize;

    for (i, line) in script.lines().enumerate() {
        let lineno = i + 1;
        let op = match parse_line(lineno, line) {
            Ok(Some(op)) => op,
            Ok(None) => continue,
            Err(e) => {
                failed += 1;
                report(lineno, "?", Err((&e, None)), json_output);
                continue;
            }
        };
        let name = op.name();
        let touches_draft = op.touches_draft();
        tracing::debug!(line = lineno, op = name, "apply");
        match session.apply(op) {
            Ok(data) => report(lineno, name, Ok(&data), json_output),
            Err(e) => {
                failed += 1;
                tracing::warn!(line = lineno, op = name, error = %e, "op failed");
                let fields = touches_draft.then(|| session.draft().errors());
                report(lineno, name, Err((&e, fields)), json_output);
            }
        }
    }

    let snapshot = session.workspace().snapshot();
    if json_output {
        let mut end = Map::new();
        end.insert("op".into(), json!("end"));
        end.insert("failed".into(), json!(failed));
        end.insert("snapshot".into(), output::json::to_value(&snapshot));
        output::json::print_line(&Value::Object(end));
    } else {
        println!("--");
        output::text::print_snapshot(&snapshot);
        if failed > 0 {
            println!("{failed} op(s) failed");
        }
    }

    if failed > 0 {
        1
    } else {
        0
    }
}

type OpError<'a> = (&'a TaskdeskError, Option<&'a crate::authoring::FieldErrors>);

fn report(lineno: usize, name: &str, result: Result<&Value, OpError<'_>>, json_output: bool) {
    if json_output {
        let mut v = match result {
            Ok(data) => output::json::success(data.clone()),
            Err((e, Some(fields))) => output::json::error_with_fields(e, fields),
            Err((e, None)) => output::json::error(e),
        };
        v["line"] = json!(lineno);
        v["op"] = json!(name);
        output::json::print_line(&v);
    } else {
        match result {
            Ok(_) => println!("{lineno}: {name} ok"),
            Err((e, fields)) => {
                println!("{lineno}: {name} failed: {}", e.message);
                if let Some(fields) = fields {
                    output::text::print_field_errors(fields);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(session: &mut Session, script: &str) -> Vec<Result<Value, TaskdeskError>> {
        script
            .lines()
            .enumerate()
            .filter_map(|(i, l)| parse_line(i + 1, l).unwrap())
            .map(|op| session.apply(op))
            .collect()
    }

    #[test]
    fn test_add_task_fills_defaults() {
        let mut s = Session::new(&Config::default());
        let out = run_script(&mut s, r#"{"op":"add_task","name":"Sweep","skill":"Operator"}"#);
        let v = out[0].as_ref().unwrap();
        assert_eq!(v["task"]["id"], "T-001");
        assert_eq!(v["task"]["createdBy"], "Admin");
        assert!(s.workspace().show_task_created_notification());
    }

    #[test]
    fn test_notices_clear_on_advance() {
        let mut s = Session::new(&Config::default());
        let out = run_script(
            &mut s,
            r#"{"op":"add_task","name":"Sweep"}
{"op":"add_task_group","name":"Audit","typeOfTG":"One-time","unit":"Unit 1","department":"Quality"}
{"op":"advance","secs":3}
{"op":"advance","secs":2}"#,
        );
        let first = out[2].as_ref().unwrap();
        assert_eq!(first["showTaskCreatedNotification"], false);
        assert_eq!(first["showTaskGroupCreatedNotification"], true);
        let second = out[3].as_ref().unwrap();
        assert_eq!(second["showTaskGroupCreatedNotification"], false);
    }

    #[test]
    fn test_materialize_missing_group() {
        let mut s = Session::new(&Config::default());
        let out = run_script(
            &mut s,
            r#"{"op":"add_tasks_from_group","groupId":"TG-999","tasks":[{"name":"x","assignToRole":"Operator"}]}"#,
        );
        assert_eq!(out[0].as_ref().unwrap()["tasks"], json!([]));
        assert!(s.workspace().tasks().is_empty());
    }

    #[test]
    fn test_draft_flow_and_status() {
        let mut s = Session::new(&Config::default());
        let out = run_script(
            &mut s,
            r#"{"op":"draft_set","field":"name","value":"Audit"}
{"op":"draft_set","field":"typeOfTG","value":"One-time"}
{"op":"draft_set","field":"unit","value":"Unit 1"}
{"op":"draft_submit"}
{"op":"draft_set","field":"department","value":"Production"}
{"op":"draft_task_set","field":"name","value":"Inspect"}
{"op":"draft_task_set","field":"assignToRole","value":"Auditor"}
{"op":"draft_task_set","field":"stepNumber","value":"1"}
{"op":"draft_add_task"}
{"op":"draft_submit"}
{"op":"set_status","id":"TG-001","status":"Completed"}
{"op":"set_status","id":"TG-001","status":"Active"}"#,
        );
        assert!(out[3].is_err());
        assert_eq!(out[8].as_ref().unwrap()["phase"], "draft_with_tasks");
        let submitted = out[9].as_ref().unwrap();
        assert_eq!(submitted["taskGroup"]["id"], "TG-001");
        assert_eq!(submitted["tasks"][0]["skill"], "Auditor");
        assert_eq!(out[10].as_ref().unwrap()["matched"], true);
        assert!(out[11].is_err());
        assert_eq!(s.workspace().task_groups()[0].status, TaskGroupStatus::Completed);
    }

    #[test]
    fn test_add_task_after_last_id_is_rejected() {
        let mut s = Session::new(&Config::default());
        let out = run_script(
            &mut s,
            r#"{"op":"add_task","id":"T-4294967295","name":"x"}
{"op":"add_task","name":"y"}"#,
        );
        assert!(out[0].is_ok());
        let err = out[1].as_ref().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(s.workspace().tasks().len(), 1);
    }

    #[test]
    fn test_oversized_advance_is_rejected() {
        let mut s = Session::new(&Config::default());
        let out = run_script(
            &mut s,
            r#"{"op":"add_task","name":"Sweep"}
{"op":"advance","secs":18446744073709551615}
{"op":"advance","secs":18446744073709551615}
{"op":"advance","secs":3}"#,
        );
        assert_eq!(out[1].as_ref().unwrap_err().code, ErrorCode::ScriptError);
        assert_eq!(out[2].as_ref().unwrap_err().code, ErrorCode::ScriptError);
        let last = out[3].as_ref().unwrap();
        assert_eq!(last["elapsedSecs"], 3);
        assert_eq!(last["showTaskCreatedNotification"], false);
    }

    #[test]
    fn test_parse_line_skips_comments() {
        assert!(parse_line(1, "  ").unwrap().is_none());
        assert!(parse_line(2, "# setup").unwrap().is_none());
        let err = parse_line(3, r#"{"op":"fly"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::ScriptError);
        assert!(err.message.starts_with("line 3:"));
    }
}
