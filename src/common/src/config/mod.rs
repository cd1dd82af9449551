use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use figment::{
    Figment,
    providers::{Data, Env, Format, Serialized, Toml},
};

/// Size of the employee identifier space (`100_000_000..=999_999_999`).
pub const EMPLOYEE_ID_SPACE: u64 = 900_000_000;

/// Upper bounds for values the generators turn into date or interval arithmetic.
pub const MAX_AGE: u32 = 150;
pub const MAX_SHIFTS_PER_DAY: u32 = 24;
pub const MAX_VALIDITY_DAYS: u32 = 36_500;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("output.chunk_size must be at least 1")]
    ZeroChunkSize,
    #[error("employees.count {count} exceeds the identifier space of {space}", space = EMPLOYEE_ID_SPACE)]
    TooManyEmployees { count: u64 },
    #[error("{field} must be within [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },
    #[error("{field}: minimum {min} is greater than maximum {max}")]
    InvalidRange {
        field: &'static str,
        min: String,
        max: String,
    },
    #[error("oncall.start_hour_max {0} is past the last hour of the day")]
    InvalidStartHour(u8),
    #[error("oncall.minute_offsets must not be empty")]
    EmptyMinuteOffsets,
    #[error("oncall.minute_offsets contains {0}, which is not a valid minute")]
    InvalidMinuteOffset(u8),
    #[error("payroll amounts must not be negative, got {0}")]
    NegativeAmount(f64),
    #[error("payroll amounts must be finite, got {0}")]
    NonFiniteAmount(f64),
    #[error("{field} is {value}, above the limit of {limit}")]
    AboveLimit {
        field: &'static str,
        value: u32,
        limit: u32,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the SQL files are written to
    pub dir: String,
    /// Maximum number of rows per INSERT statement
    pub chunk_size: usize,
    /// Also write `set_sequences.sql`
    pub write_sequences: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "output_sql_explicit_ids".to_string(),
            chunk_size: 1000,
            write_sequences: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmployeeConfig {
    /// Number of employees to generate
    pub count: u64,
    /// Seed for the random generator; a fresh entropy seed is used when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Chance that an employee has a termination date
    pub termination_probability: f64,
    /// Chance that an employee row carries a note
    pub notes_probability: f64,
    /// Youngest allowed age at hire
    pub min_age: u32,
    /// Oldest allowed age at hire
    pub max_age: u32,
}

impl Default for EmployeeConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            seed: None,
            termination_probability: 0.02,
            notes_probability: 0.35,
            min_age: 18,
            max_age: 65,
        }
    }
}

/// Manager hierarchy policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Number of leading employees that never get a manager
    pub root_count: usize,
    /// Chance that a later employee is also left without a manager
    pub root_probability: f64,
    /// Candidate draws before giving up and leaving the employee as a root
    pub max_attempts: usize,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            root_count: 100,
            root_probability: 0.05,
            max_attempts: 5,
        }
    }
}

/// On-call shift scheduling bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OnCallConfig {
    pub min_shifts_per_day: u32,
    pub max_shifts_per_day: u32,
    /// Shortest shift, in whole hours
    pub min_hours: u8,
    /// Longest shift, in whole hours
    pub max_hours: u8,
    /// Earliest start hour
    pub start_hour_min: u8,
    /// Latest start hour
    pub start_hour_max: u8,
    /// Minutes a shift may start at
    pub minute_offsets: Vec<u8>,
}

impl Default for OnCallConfig {
    fn default() -> Self {
        Self {
            min_shifts_per_day: 0,
            max_shifts_per_day: 2,
            min_hours: 2,
            max_hours: 6,
            start_hour_min: 6,
            start_hour_max: 20,
            minute_offsets: vec![0, 15, 30, 45],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayrollConfig {
    pub min_per_employee: u32,
    pub max_per_employee: u32,
    pub min_amount: f64,
    pub max_amount: f64,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            min_per_employee: 1,
            max_per_employee: 3,
            min_amount: 800.0,
            max_amount: 15_000.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Fraction of employees holding licenses
    pub employee_ratio: f64,
    /// Lower bound on the number of licensed employees
    pub min_employees: u64,
    pub min_per_employee: u32,
    pub max_per_employee: u32,
    pub min_validity_days: u32,
    pub max_validity_days: u32,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            employee_ratio: 0.5,
            min_employees: 10,
            min_per_employee: 1,
            max_per_employee: 3,
            min_validity_days: 365,
            max_validity_days: 365 * 5,
        }
    }
}

/// Bounds for every generated date and timestamp.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DateConfig {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            min: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            max: NaiveDate::from_ymd_opt(2029, 12, 31).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    pub output: OutputConfig,
    pub employees: EmployeeConfig,
    pub hierarchy: HierarchyConfig,
    pub oncall: OnCallConfig,
    pub payroll: PayrollConfig,
    pub licenses: LicenseConfig,
    pub dates: DateConfig,
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}

fn check_limit(field: &'static str, value: u32, limit: u32) -> Result<(), ConfigError> {
    if value > limit {
        return Err(ConfigError::AboveLimit {
            field,
            value,
            limit,
        });
    }
    Ok(())
}

fn check_range<T: PartialOrd + ToString>(
    field: &'static str,
    min: T,
    max: T,
) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange {
            field,
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

impl Configuration {
    fn figment(file: Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            .merge(file)
            .merge(Env::prefixed("STAFFGEN__").split("__"))
    }

    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config = Self::figment(Toml::file("staffgen.toml"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        let config = Self::figment(Toml::file(path))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }

    /// Check every bound the generators rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }

        let employees = &self.employees;
        if employees.count > EMPLOYEE_ID_SPACE {
            return Err(ConfigError::TooManyEmployees {
                count: employees.count,
            });
        }
        check_probability(
            "employees.termination_probability",
            employees.termination_probability,
        )?;
        check_probability("employees.notes_probability", employees.notes_probability)?;
        check_range("employees.age", employees.min_age, employees.max_age)?;
        check_limit("employees.max_age", employees.max_age, MAX_AGE)?;

        check_probability(
            "hierarchy.root_probability",
            self.hierarchy.root_probability,
        )?;

        let oncall = &self.oncall;
        check_range(
            "oncall.shifts_per_day",
            oncall.min_shifts_per_day,
            oncall.max_shifts_per_day,
        )?;
        check_limit(
            "oncall.max_shifts_per_day",
            oncall.max_shifts_per_day,
            MAX_SHIFTS_PER_DAY,
        )?;
        check_range("oncall.hours", oncall.min_hours, oncall.max_hours)?;
        check_range(
            "oncall.start_hour",
            oncall.start_hour_min,
            oncall.start_hour_max,
        )?;
        if oncall.start_hour_max > 23 {
            return Err(ConfigError::InvalidStartHour(oncall.start_hour_max));
        }
        if oncall.minute_offsets.is_empty() {
            return Err(ConfigError::EmptyMinuteOffsets);
        }
        if let Some(&minute) = oncall.minute_offsets.iter().find(|&&m| m >= 60) {
            return Err(ConfigError::InvalidMinuteOffset(minute));
        }

        let payroll = &self.payroll;
        check_range(
            "payroll.per_employee",
            payroll.min_per_employee,
            payroll.max_per_employee,
        )?;
        if let Some(&amount) = [payroll.min_amount, payroll.max_amount]
            .iter()
            .find(|amount| !amount.is_finite())
        {
            return Err(ConfigError::NonFiniteAmount(amount));
        }
        if payroll.min_amount < 0.0 {
            return Err(ConfigError::NegativeAmount(payroll.min_amount));
        }
        check_range("payroll.amount", payroll.min_amount, payroll.max_amount)?;

        let licenses = &self.licenses;
        check_probability("licenses.employee_ratio", licenses.employee_ratio)?;
        check_range(
            "licenses.per_employee",
            licenses.min_per_employee,
            licenses.max_per_employee,
        )?;
        check_range(
            "licenses.validity_days",
            licenses.min_validity_days,
            licenses.max_validity_days,
        )?;
        check_limit(
            "licenses.max_validity_days",
            licenses.max_validity_days,
            MAX_VALIDITY_DAYS,
        )?;

        check_range("dates", self.dates.min, self.dates.max)?;

        Ok(())
    }
}
