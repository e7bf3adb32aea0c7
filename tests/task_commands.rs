mod support;

use predicates::str::contains;
use support::TestPlanner;

#[test]
fn add_then_list_shows_the_task() {
    let planner = TestPlanner::new();

    planner
        .cmd()
        .args(["add", "Write report", "--due", "2025-03-10", "--list", "Work"])
        .assert()
        .success()
        .stdout(contains("Task created"))
        .stdout(contains("Write report"));

    planner
        .cmd()
        .args(["list", "all"])
        .assert()
        .success()
        .stdout(contains("1 task(s)"))
        .stdout(contains("Write report"))
        .stdout(contains("due 2025-03-10"));
}

#[test]
fn created_tasks_default_to_not_completed_and_not_starred() {
    let planner = TestPlanner::new();
    planner.add_task(&["Write report", "--due", "2025-03-10"]);

    let data = planner.json(&["list", "all"]);
    assert_eq!(data["count"], 1);
    let task = &data["tasks"][0];
    assert_eq!(task["description"], "Write report");
    assert_eq!(task["completed"], false);
    assert_eq!(task["importance"], false);
    assert_eq!(task["list"], "Personal");
    assert_eq!(task["priority"], "low");
}

#[test]
fn empty_description_is_rejected() {
    let planner = TestPlanner::new();
    planner
        .cmd()
        .args(["add", "   "])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("description"));
}

#[test]
fn invalid_due_date_is_rejected() {
    let planner = TestPlanner::new();
    planner
        .cmd()
        .args(["add", "Task", "--due", "10/03/2025"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("YYYY-MM-DD"));
}

#[test]
fn missing_user_is_an_authentication_error() {
    let planner = TestPlanner::new();
    planner
        .cmd_without_user()
        .args(["list"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("No user is signed in"));
}

#[test]
fn done_toggles_completion_both_ways() {
    let planner = TestPlanner::new();
    let id = planner.add_task(&["Flip me"]);

    let task = planner.json(&["done", &id]);
    assert_eq!(task["completed"], true);

    let task = planner.json(&["done", &id]);
    assert_eq!(task["completed"], false);
}

#[test]
fn star_toggles_importance_independently_of_completion() {
    let planner = TestPlanner::new();
    let id = planner.add_task(&["Star me"]);

    planner.json(&["done", &id]);
    let task = planner.json(&["star", &id]);
    assert_eq!(task["completed"], true);
    assert_eq!(task["importance"], true);
}

#[test]
fn edit_merges_partial_updates() {
    let planner = TestPlanner::new();
    let id = planner.add_task(&["Read chapter 4", "--due", "2025-04-01"]);

    let task = planner.json(&["edit", &id, "--priority", "high", "--notes", "sections 4.1-4.3"]);
    assert_eq!(task["priority"], "high");
    assert_eq!(task["subTasks"], "sections 4.1-4.3");
    // Untouched fields survive the merge
    assert_eq!(task["description"], "Read chapter 4");
    assert_eq!(task["dueDate"], "2025-04-01");
}

#[test]
fn edit_can_clear_the_due_date() {
    let planner = TestPlanner::new();
    let id = planner.add_task(&["Undated soon", "--due", "2025-04-01"]);

    let task = planner.json(&["edit", &id, "--due", ""]);
    assert!(task.get("dueDate").is_none(), "cleared due date is omitted");
}

#[test]
fn edit_with_no_fields_is_an_error() {
    let planner = TestPlanner::new();
    let id = planner.add_task(&["Task"]);

    planner
        .cmd()
        .args(["edit", &id])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("nothing to edit"));
}

#[test]
fn operations_on_unknown_ids_fail_with_not_found() {
    let planner = TestPlanner::new();
    planner.add_task(&["Exists"]);

    for cmd in ["done", "star", "rm"] {
        planner
            .cmd()
            .args([cmd, "no-such-id"])
            .assert()
            .failure()
            .code(2)
            .stderr(contains("Task not found"));
    }
}

#[test]
fn rm_removes_the_task_from_every_view() {
    let planner = TestPlanner::new();
    let today = studyplan::date::format_date(studyplan::date::today());
    let id = planner.add_task(&["Due today", "--due", &today]);

    assert_eq!(planner.json(&["list", "today"])["count"], 1);

    planner.cmd().args(["rm", &id]).assert().success();

    assert_eq!(planner.json(&["list", "today"])["count"], 0);
    assert_eq!(planner.json(&["list", "all"])["count"], 0);

    // The calendar cell for today is empty in the same pass
    let data = planner.json(&["cal", "--view", "day"]);
    let placed: usize = data["schedule"]["hours"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["tasks"].as_array().unwrap().len())
        .sum();
    assert_eq!(placed, 0);
}

#[test]
fn tasks_persist_across_invocations() {
    let planner = TestPlanner::new();
    planner.add_task(&["Durable task"]);

    // A completely fresh process sees the task
    let data = planner.json(&["list", "all"]);
    assert_eq!(data["count"], 1);
}

#[test]
fn users_do_not_see_each_others_tasks() {
    let planner = TestPlanner::new();
    planner.add_task(&["Mine"]);

    let mut other = planner.cmd();
    other.env("STUDYPLAN_USER", "someone-else");
    other
        .args(["list", "all"])
        .assert()
        .success()
        .stdout(contains("0 task(s)"));
}

#[test]
fn lists_reports_known_and_custom_labels() {
    let planner = TestPlanner::new();
    planner.add_task(&["Homework", "--list", "Study"]);
    planner.add_task(&["Side project", "--list", "Tinkering"]);

    let data = planner.json(&["lists"]);
    let names: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|tally| tally["list"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Personal", "Work", "Study", "Tinkering"]);

    let study = &data.as_array().unwrap()[2];
    assert_eq!(study["total"], 1);
    assert_eq!(study["pending"], 1);
}
