use serde_json::json;

use crate::catalog;
use crate::cli::commands::CatalogKind;
use crate::output;

pub fn run(kind: CatalogKind, json_output: bool) -> i32 {
    if json_output {
        let items = match kind {
            CatalogKind::Types => output::json::to_value(&catalog::task_types()),
            CatalogKind::Skills => output::json::to_value(&catalog::task_skills()),
            CatalogKind::Units => output::json::to_value(&catalog::units()),
            CatalogKind::Departments => json!(catalog::departments()),
            CatalogKind::Roles => json!(catalog::roles()),
            CatalogKind::GroupTypes => json!(catalog::group_types()),
        };
        output::json::print(&output::json::success(json!({ "items": items })));
        return 0;
    }

    match kind {
        CatalogKind::Types => {
            for t in catalog::task_types() {
                println!("  {} {} - {}", t.id, t.name, t.description);
            }
        }
        CatalogKind::Skills => {
            for s in catalog::task_skills() {
                println!("  {} {} ({})", s.id, s.name, s.department);
            }
        }
        CatalogKind::Units => {
            for u in catalog::units() {
                println!("  {} {} @ {}", u.id, u.name, u.location);
            }
        }
        CatalogKind::Departments => catalog::departments().iter().for_each(|d| println!("  {d}")),
        CatalogKind::Roles => catalog::roles().iter().for_each(|r| println!("  {r}")),
        CatalogKind::GroupTypes => catalog::group_types().iter().for_each(|g| println!("  {g}")),
    }
    0
}
