//! Fixed reference tables behind the authoring form's dropdowns.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskType {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskSkill {
    pub id: &'static str,
    pub name: &'static str,
    pub department: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub id: &'static str,
    pub name: &'static str,
    pub location: &'static str,
}

const TASK_TYPES: &[TaskType] = &[
    TaskType {
        id: "TT-01",
        name: "Scheduled",
        description: "Runs on a fixed calendar",
    },
    TaskType {
        id: "TT-02",
        name: "On-demand",
        description: "Raised by an operator when needed",
    },
    TaskType {
        id: "TT-03",
        name: "Inspection",
        description: "Checks and audits",
    },
    TaskType {
        id: "TT-04",
        name: "Maintenance",
        description: "Upkeep of equipment and facilities",
    },
    TaskType {
        id: "TT-05",
        name: "Logistics",
        description: "Moving stock between locations",
    },
];

const TASK_SKILLS: &[TaskSkill] = &[
    TaskSkill {
        id: "SK-01",
        name: "Auditor",
        department: "Quality",
    },
    TaskSkill {
        id: "SK-02",
        name: "Technician",
        department: "Maintenance",
    },
    TaskSkill {
        id: "SK-03",
        name: "Electrician",
        department: "Maintenance",
    },
    TaskSkill {
        id: "SK-04",
        name: "Operator",
        department: "Production",
    },
    TaskSkill {
        id: "SK-05",
        name: "Supervisor",
        department: "Production",
    },
    TaskSkill {
        id: "SK-06",
        name: "Storekeeper",
        department: "Logistics",
    },
];

const UNITS: &[Unit] = &[
    Unit {
        id: "U-01",
        name: "Unit 1",
        location: "North Plant",
    },
    Unit {
        id: "U-02",
        name: "Unit 2",
        location: "North Plant",
    },
    Unit {
        id: "U-03",
        name: "Unit 3",
        location: "South Plant",
    },
    Unit {
        id: "U-04",
        name: "Warehouse",
        location: "South Plant",
    },
];

const DEPARTMENTS: &[&str] = &["Production", "Maintenance", "Quality", "Logistics"];

const ROLES: &[&str] = &["Admin", "Manager", "Supervisor", "Auditor", "Technician", "Operator"];

const GROUP_TYPES: &[&str] = &[
    "Internal Orders",
    "Maintainance Work",
    "Quality Checks",
    "Stock Transfer",
];

pub fn task_types() -> &'static [TaskType] {
    TASK_TYPES
}

pub fn task_skills() -> &'static [TaskSkill] {
    TASK_SKILLS
}

pub fn units() -> &'static [Unit] {
    UNITS
}

pub fn departments() -> &'static [&'static str] {
    DEPARTMENTS
}

pub fn roles() -> &'static [&'static str] {
    ROLES
}

pub fn group_types() -> &'static [&'static str] {
    GROUP_TYPES
}

/// Look up a task type by id or name.
pub fn find_task_type(key: &str) -> Option<&'static TaskType> {
    TASK_TYPES.iter().find(|t| t.id == key || t.name == key)
}

pub fn find_task_skill(key: &str) -> Option<&'static TaskSkill> {
    TASK_SKILLS.iter().find(|s| s.id == key || s.name == key)
}

pub fn find_unit(key: &str) -> Option<&'static Unit> {
    UNITS.iter().find(|u| u.id == key || u.name == key)
}

pub fn skills_for_department(department: &str) -> impl Iterator<Item = &'static TaskSkill> + '_ {
    TASK_SKILLS.iter().filter(move |s| s.department == department)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id_or_name() {
        assert_eq!(find_unit("U-01").map(|u| u.name), Some("Unit 1"));
        assert_eq!(find_unit("Unit 1").map(|u| u.id), Some("U-01"));
        assert!(find_unit("Unit 9").is_none());
        assert_eq!(find_task_skill("Auditor").map(|s| s.department), Some("Quality"));
        assert_eq!(find_task_type("TT-04").map(|t| t.name), Some("Maintenance"));
    }

    #[test]
    fn test_skills_by_department() {
        let names: Vec<_> = skills_for_department("Maintenance").map(|s| s.name).collect();
        assert_eq!(names, vec!["Technician", "Electrician"]);
    }

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<_> = task_types().iter().map(|t| t.id).collect();
        ids.extend(task_skills().iter().map(|s| s.id));
        ids.extend(units().iter().map(|u| u.id));
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(before, ids.len());
    }
}
