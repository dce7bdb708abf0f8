use huddle_core::{regroup_with_options, PlanStats, Student, TrialOptions};

fn main() {
    let roster = [
        ("ana", "robotics", "chess"),
        ("ben", "robotics", "poetry"),
        ("cai", "robotics", "robotics"),
        ("dev", "robotics", "chess"),
        ("eli", "robotics", "chess"),
        ("fay", "robotics", "robotics"),
        ("gus", "robotics", "robotics"),
        ("hal", "chess", "chess"),
        ("ivy", "chess", "robotics"),
        ("jo", "poetry", "robotics"),
        ("kim", "poetry", "chess"),
    ];
    let students: Vec<Student> = roster
        .iter()
        .map(|&(id, primary, secondary)| Student::new(id, primary, secondary))
        .collect();

    let options = TrialOptions::default().with_seed(2024);
    let plan = match regroup_with_options(&students, &options) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("regroup failed: {err:#}");
            return;
        }
    };

    for (i, group) in plan.groups().iter().enumerate() {
        let ids: Vec<&str> = group.members().iter().map(|s| s.id.as_str()).collect();
        println!("Group {} [{}]: {}", i + 1, group.interest(), ids.join(", "));
    }
    let left: Vec<&str> = plan.ungrouped().iter().map(|s| s.id.as_str()).collect();
    println!("Ungrouped: {}", left.join(", "));

    let stats = PlanStats::from_plan(&plan);
    println!(
        "{} of {} placed (trial {}, seed {})",
        stats.grouped, stats.total_students, stats.trial, stats.seed
    );
}
