use std::collections::BTreeSet;
use std::io::{self, Read};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::authoring::{AuthoringWorkflow, GroupField, TaskField};
use crate::cli::commands::GroupCommands;
use crate::config::Config;
use crate::error::TaskdeskError;
use crate::notify::SystemClock;
use crate::output;
use crate::store::Workspace;

pub fn run(cmd: GroupCommands, config: &Config, json_output: bool) -> i32 {
    match cmd {
        GroupCommands::Create => {
            let mut workflow = AuthoringWorkflow::new();
            match run_create(&mut workflow, config, json_output) {
                Ok(code) => code,
                Err(e) => {
                    if json_output {
                        let body = output::json::error_with_fields(&e, workflow.errors());
                        output::json::print(&body);
                    } else {
                        eprintln!("Error: {}", e.message);
                        output::text::print_field_errors(workflow.errors());
                    }
                    1
                }
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupInput {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "typeOfTG", default)]
    pub type_of_tg: String,
    #[serde(default)]
    pub tg_type: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date_time: String,
    #[serde(default)]
    pub tasks: Vec<TaskInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub step_number: String,
    #[serde(default)]
    pub assign_to_role: String,
    #[serde(default)]
    pub scheduling_type: String,
    #[serde(default)]
    pub repeat_pattern: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub assign_to: String,
    #[serde(default)]
    pub start_date_time: String,
    #[serde(default)]
    pub dependent_steps: BTreeSet<String>,
}

/// Type the document into the form, field by field, then press create.
pub(crate) fn fill(
    workflow: &mut AuthoringWorkflow,
    input: GroupInput,
) -> Result<(), TaskdeskError> {
    workflow.open();
    for (field, value) in [
        (GroupField::Name, input.name),
        (GroupField::TypeOfTg, input.type_of_tg),
        (GroupField::TgType, input.tg_type),
        (GroupField::Unit, input.unit),
        (GroupField::Department, input.department),
        (GroupField::Description, input.description),
        (GroupField::StartDateTime, input.start_date_time),
    ] {
        workflow.set_group_field(field, value);
    }

    for (i, task) in input.tasks.into_iter().enumerate() {
        for (field, value) in [
            (TaskField::Name, task.name),
            (TaskField::StepNumber, task.step_number),
            (TaskField::AssignToRole, task.assign_to_role),
            (TaskField::SchedulingType, task.scheduling_type),
            (TaskField::RepeatPattern, task.repeat_pattern),
            (TaskField::Duration, task.duration),
            (TaskField::AssignTo, task.assign_to),
            (TaskField::StartDateTime, task.start_date_time),
        ] {
            workflow.set_task_field(field, value);
        }
        for step in &task.dependent_steps {
            workflow.toggle_dependent_step(step);
        }
        workflow
            .add_task()
            .map_err(|e| TaskdeskError::new(e.code, format!("tasks[{i}]: {}", e.message)))?;
    }
    Ok(())
}

fn run_create(
    workflow: &mut AuthoringWorkflow,
    config: &Config,
    json_output: bool,
) -> Result<i32, TaskdeskError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let group_input: GroupInput = serde_json::from_str(&input)
        .map_err(|e| TaskdeskError::validation(format!("Invalid JSON: {e}")))?;

    let mut ws = Workspace::new(config, Arc::new(SystemClock));
    fill(workflow, group_input)?;
    let submission = workflow.submit(&mut ws)?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "taskGroup": submission.task_group,
            "tasks": submission.tasks,
            "tasksCreated": submission.tasks.len()
        })));
    } else {
        output::text::print_task_group(&submission.task_group);
        println!("\nCreated tasks:");
        output::text::print_task_list(&submission.tasks);
    }
    Ok(0)
}
