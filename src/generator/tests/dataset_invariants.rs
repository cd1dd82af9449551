use std::collections::{HashMap, HashSet};

use common::config::Configuration;
use generator::sampling::age_on;
use generator::{DatasetBuilder, DayOfWeek, EmployeeId};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn build(count: u64, seed: u64) -> generator::Dataset {
    let mut config = Configuration::default();
    config.employees.count = count;
    config.hierarchy.root_count = 5;
    let mut rng = SmallRng::seed_from_u64(seed);
    DatasetBuilder::new(&config).build(&mut rng).unwrap()
}

#[test]
fn test_manager_chains_terminate_without_repeats() {
    let dataset = build(1_500, 1);
    let managers: HashMap<EmployeeId, Option<EmployeeId>> = dataset
        .employees
        .iter()
        .map(|e| (e.id, e.manager_id))
        .collect();
    let total = dataset.employees.len();

    for employee in &dataset.employees {
        let mut seen = HashSet::from([employee.id]);
        let mut steps = 0;
        let mut current = employee.manager_id;
        while let Some(manager) = current {
            assert!(seen.insert(manager), "cycle through {manager}");
            steps += 1;
            current = managers[&manager];
        }
        assert!(steps < total);
    }
}

#[test]
fn test_managers_are_created_earlier() {
    let dataset = build(1_000, 2);
    let index: HashMap<EmployeeId, usize> = dataset
        .employees
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id, i))
        .collect();

    for (i, employee) in dataset.employees.iter().enumerate() {
        if i < 5 {
            assert_eq!(employee.manager_id, None);
        }
        if let Some(manager) = employee.manager_id {
            assert!(index[&manager] < i);
        }
        assert_eq!(dataset.relation.manager_of(employee.id), employee.manager_id);
    }
}

#[test]
fn test_shift_groups_are_disjoint_and_ranked() {
    let dataset = build(400, 3);
    let mut groups: HashMap<(EmployeeId, DayOfWeek), Vec<_>> = HashMap::new();
    for shift in &dataset.shifts {
        groups
            .entry((shift.employee_id, shift.day))
            .or_default()
            .push(shift);
    }

    for shifts in groups.values_mut() {
        shifts.sort_by_key(|s| s.start);
        let ranks: Vec<u32> = shifts.iter().map(|s| s.escalation_order).collect();
        let expected: Vec<u32> = (1..=shifts.len() as u32).collect();
        assert_eq!(ranks, expected);

        for (i, a) in shifts.iter().enumerate() {
            for b in &shifts[i + 1..] {
                assert!(a.end <= b.start || b.end <= a.start);
            }
        }
    }
}

#[test]
fn test_rows_reference_existing_employees() {
    let dataset = build(300, 4);
    let ids: HashSet<EmployeeId> = dataset.employees.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), dataset.employees.len());

    assert!(dataset.payroll.iter().all(|p| ids.contains(&p.employee_id)));
    assert!(dataset.licenses.iter().all(|l| ids.contains(&l.employee_id)));
    assert!(dataset.shifts.iter().all(|s| ids.contains(&s.employee_id)));

    let shift_ids: HashSet<u64> = dataset.shifts.iter().map(|s| s.id).collect();
    assert_eq!(shift_ids.len(), dataset.shifts.len());
}

#[test]
fn test_dates_are_consistent_with_hire() {
    let dataset = build(500, 5);
    let hires: HashMap<EmployeeId, _> = dataset
        .employees
        .iter()
        .map(|e| (e.id, e.hire_date))
        .collect();

    for employee in &dataset.employees {
        let age = age_on(employee.hire_date, employee.birth_date);
        assert!((18..=65).contains(&age));
        if let Some(terminated) = employee.termination_date {
            assert!(terminated > employee.hire_date);
            assert!(!employee.active);
        }
    }
    for entry in &dataset.payroll {
        assert!(entry.pay_date >= hires[&entry.employee_id]);
        assert!((800.0..=15_000.0).contains(&entry.amount));
    }
    for license in &dataset.licenses {
        assert!(license.issued_date >= hires[&license.employee_id]);
        assert!(license.expiry_date >= license.issued_date);
        assert!(license.license_name.ends_with(&format!("(Level {})", license.level)));
    }
}

#[test]
fn test_emails_are_unique() {
    let dataset = build(2_000, 6);
    let emails: HashSet<&str> = dataset.employees.iter().map(|e| e.email.as_str()).collect();
    assert_eq!(emails.len(), dataset.employees.len());
}
