use crate::authoring::FieldErrors;
use crate::models::{Task, TaskGroup};
use crate::store::Snapshot;

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        println!("  {} {} [{}] {}", t.id, t.name, t.skill, t.unit);
    }
}

pub fn print_task_group(g: &TaskGroup) {
    println!("Task group: {} ({})", g.name, g.id);
    println!("  Type: {}", g.type_of_tg.as_str());
    if !g.tg_type.is_empty() {
        println!("  Classification: {}", g.tg_type);
    }
    println!("  Unit: {}  Department: {}", g.unit, g.department);
    println!("  Status: {}", g.status.as_str());
    if let Some(ref desc) = g.description {
        println!("  Description: {desc}");
    }
    if let Some(ref start) = g.start_date_time {
        println!("  Starts: {start}");
    }
    println!("  Tasks ({}):", g.number_of_tasks);
    for t in &g.tasks {
        let step = t.step_number.as_deref().unwrap_or("-");
        let mut line = format!("    [{step}] {} @{}", t.name, t.assign_to_role);
        if !t.dependent_steps.is_empty() {
            let deps: Vec<_> = t.dependent_steps.iter().map(String::as_str).collect();
            line.push_str(&format!(" after {}", deps.join(",")));
        }
        if let Some(pattern) = t.repeat_pattern {
            line.push_str(&format!(" ({})", pattern.as_str()));
        }
        println!("{line}");
    }
}

pub fn print_task_group_list(groups: &[TaskGroup]) {
    if groups.is_empty() {
        println!("No task groups found.");
        return;
    }
    for g in groups {
        println!(
            "  {} {} [{}] {} tasks, {}",
            g.id,
            g.name,
            g.status.as_str(),
            g.number_of_tasks,
            g.type_of_tg.as_str()
        );
    }
}

pub fn print_field_errors(errors: &FieldErrors) {
    for f in &errors.group {
        eprintln!("  ! {}", f.as_str());
    }
    for f in &errors.task {
        eprintln!("  ! task.{}", f.as_str());
    }
}

pub fn print_snapshot(s: &Snapshot) {
    println!("Task groups:");
    print_task_group_list(&s.task_groups);
    println!("Tasks:");
    print_task_list(&s.tasks);
    if s.show_task_created_notification {
        if let Some(ref t) = s.last_created_task {
            println!("* Task created: {} ({})", t.name, t.id);
        }
    }
    if s.show_task_group_created_notification {
        if let Some(ref g) = s.last_created_task_group {
            println!("* Task group created: {} ({})", g.name, g.id);
        }
    }
}
