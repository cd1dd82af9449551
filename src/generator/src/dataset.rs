//! Assembles every table of the personnel dataset from one random source.

use chrono::Duration;
use common::config::Configuration;
use rand::Rng;
use rand::seq::{SliceRandom, index};
use serde::Serialize;

use crate::GenerationError;
use crate::catalog::{
    DEPARTMENTS, EMAIL_DOMAINS, FIRST_NAMES, LAST_NAMES, LICENSES, NOTES, POSITIONS,
    positions_in,
};
use crate::clock::DayOfWeek;
use crate::hierarchy::{HierarchyBuilder, HierarchyPolicy, ManagerRelation};
use crate::records::{
    Department, EmergencyContact, EmergencyContacts, Employee, EmployeeLicense, OnCallShift,
    PayrollEntry, Position,
};
use crate::sampling::{
    DateRange, EmailRegistry, birth_date_for, phone_number, round_cents, street_address,
    unique_employee_ids,
};
use crate::shifts::{ShiftPolicy, generate_day_shifts};

/// Days added to the hire date when a drawn termination is not after it.
const MIN_TENURE_DAYS: i64 = 30;

/// Row count per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub departments: usize,
    pub positions: usize,
    pub employees: usize,
    pub payroll: usize,
    pub licenses: usize,
    pub shifts: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub departments: Vec<Department>,
    pub positions: Vec<Position>,
    /// In creation order
    pub employees: Vec<Employee>,
    /// Manager relation built alongside `employees`
    pub relation: ManagerRelation,
    pub payroll: Vec<PayrollEntry>,
    pub licenses: Vec<EmployeeLicense>,
    pub shifts: Vec<OnCallShift>,
}

impl Dataset {
    pub fn counts(&self) -> RowCounts {
        RowCounts {
            departments: self.departments.len(),
            positions: self.positions.len(),
            employees: self.employees.len(),
            payroll: self.payroll.len(),
            licenses: self.licenses.len(),
            shifts: self.shifts.len(),
        }
    }
}

fn pick<R: Rng + ?Sized>(items: &[&'static str], rng: &mut R) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

pub struct DatasetBuilder<'a> {
    config: &'a Configuration,
    dates: DateRange,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self {
            config,
            dates: DateRange::new(config.dates.min, config.dates.max),
        }
    }

    /// Generate all tables. Employees are processed strictly in creation
    /// order; everything else is derived from the finished employee list.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Dataset, GenerationError> {
        let departments = self.departments(rng);
        let positions = self.positions(rng);
        log::debug!(
            "Generated {} departments and {} positions",
            departments.len(),
            positions.len()
        );

        let (employees, relation) = self.employees(rng)?;
        log::info!(
            "Generated {} employees ({} without a manager)",
            employees.len(),
            relation.roots().count()
        );

        let payroll = self.payroll(&employees, rng);
        log::info!("Generated {} payroll entries", payroll.len());

        let licenses = self.licenses(&employees, rng);
        log::info!("Generated {} employee licenses", licenses.len());

        let shifts = self.shifts(&employees, rng);
        log::info!("Generated {} on-call shifts", shifts.len());

        Ok(Dataset {
            departments,
            positions,
            employees,
            relation,
            payroll,
            licenses,
            shifts,
        })
    }

    fn departments<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Department> {
        DEPARTMENTS
            .iter()
            .zip(1..)
            .map(|(spec, id)| Department {
                id,
                name: spec.name,
                description: spec.description,
                created_at: self.dates.sample_timestamp(rng),
            })
            .collect()
    }

    fn positions<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Position> {
        POSITIONS
            .iter()
            .zip(1..)
            .map(|(spec, id)| Position {
                id,
                title: spec.title,
                department_id: spec.department_id,
                description: spec.description,
                created_at: self.dates.sample_timestamp(rng),
            })
            .collect()
    }

    fn employees<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Vec<Employee>, ManagerRelation), GenerationError> {
        let config = &self.config.employees;
        let ids = unique_employee_ids(config.count, rng)?;

        let mut hierarchy = HierarchyBuilder::new(HierarchyPolicy::from(&self.config.hierarchy));
        let mut emails = EmailRegistry::new();
        let mut employees = Vec::with_capacity(ids.len());

        for id in ids {
            let first_name = pick(FIRST_NAMES, rng);
            let last_name = pick(LAST_NAMES, rng);
            let email = emails.claim(first_name, last_name, pick(EMAIL_DOMAINS, rng));

            let hire_date = self.dates.sample_date(rng);
            let birth_date = birth_date_for(hire_date, config.min_age, config.max_age, rng);

            let termination_date = if rng.gen_bool(config.termination_probability) {
                let drawn = self.dates.sample_from(hire_date, rng);
                Some(if drawn > hire_date {
                    drawn
                } else {
                    hire_date + Duration::days(MIN_TENURE_DAYS)
                })
            } else {
                None
            };

            let department_id = rng.gen_range(1..=DEPARTMENTS.len() as u32);
            let position_id = match positions_in(department_id).choose(rng) {
                Some(&position) => position,
                None => rng.gen_range(1..=POSITIONS.len() as u32),
            };

            let manager_id = hierarchy.assign(id, rng);

            let emergency_contacts = EmergencyContacts {
                contacts: vec![EmergencyContact {
                    name: format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng)),
                    phone: phone_number(rng),
                }],
            };

            let notes = if rng.gen_bool(config.notes_probability) {
                pick(NOTES, rng).to_string()
            } else {
                String::new()
            };

            employees.push(Employee {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
                phone: phone_number(rng),
                address: street_address(rng),
                birth_date,
                hire_date,
                termination_date,
                active: termination_date.is_none(),
                department_id,
                position_id,
                manager_id,
                emergency_contacts,
                notes,
                created_at: self.dates.sample_timestamp(rng),
            });
        }

        Ok((employees, hierarchy.into_relation()))
    }

    fn payroll<R: Rng + ?Sized>(&self, employees: &[Employee], rng: &mut R) -> Vec<PayrollEntry> {
        let config = &self.config.payroll;
        let mut entries = Vec::new();
        let mut next_id = 1;

        for employee in employees {
            let count = rng.gen_range(config.min_per_employee..=config.max_per_employee);
            for _ in 0..count {
                let pay_date = self
                    .dates
                    .sample_from(employee.hire_date, rng)
                    .max(employee.hire_date);
                entries.push(PayrollEntry {
                    id: next_id,
                    employee_id: employee.id,
                    amount: round_cents(rng.gen_range(config.min_amount..=config.max_amount)),
                    pay_date,
                    notes: pick(NOTES, rng).to_string(),
                    created_at: self.dates.sample_timestamp(rng),
                });
                next_id += 1;
            }
        }

        entries
    }

    /// Number of employees that hold licenses.
    fn licensed_employee_count(&self, employee_count: usize) -> usize {
        let config = &self.config.licenses;
        let by_ratio = (employee_count as f64 * config.employee_ratio) as usize;
        by_ratio
            .max(config.min_employees as usize)
            .min(employee_count)
    }

    fn licenses<R: Rng + ?Sized>(
        &self,
        employees: &[Employee],
        rng: &mut R,
    ) -> Vec<EmployeeLicense> {
        let config = &self.config.licenses;
        let amount = self.licensed_employee_count(employees.len());
        let mut licenses = Vec::new();
        let mut next_id = 1;

        for picked in index::sample(rng, employees.len(), amount) {
            let employee = &employees[picked];
            let count = rng.gen_range(config.min_per_employee..=config.max_per_employee);
            for _ in 0..count {
                let Some(kind) = LICENSES.choose(rng) else {
                    break;
                };
                let level = rng.gen_range(1..=kind.max_level);
                let issued_date = self.dates.sample_from(employee.hire_date, rng);
                let validity = rng.gen_range(config.min_validity_days..=config.max_validity_days);
                let expiry_date =
                    (issued_date + Duration::days(i64::from(validity))).min(self.dates.max());

                licenses.push(EmployeeLicense {
                    id: next_id,
                    employee_id: employee.id,
                    license_name: format!("{} (Level {level})", kind.name),
                    level,
                    issued_date,
                    expiry_date,
                    notes: pick(NOTES, rng).to_string(),
                    created_at: self.dates.sample_timestamp(rng),
                });
                next_id += 1;
            }
        }

        licenses
    }

    fn shifts<R: Rng + ?Sized>(&self, employees: &[Employee], rng: &mut R) -> Vec<OnCallShift> {
        let policy = ShiftPolicy::from(&self.config.oncall);
        let mut shifts = Vec::new();
        let mut next_id = 1;

        for employee in employees {
            for day in DayOfWeek::ALL {
                for interval in generate_day_shifts(&policy, rng) {
                    shifts.push(OnCallShift {
                        id: next_id,
                        employee_id: employee.id,
                        day,
                        start: interval.start,
                        end: interval.end,
                        escalation_order: interval.rank,
                        created_at: self.dates.sample_timestamp(rng),
                    });
                    next_id += 1;
                }
            }
        }

        shifts
    }
}
