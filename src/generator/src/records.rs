//! Row types of the generated tables.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::clock::{ClockTime, DayOfWeek};
use crate::hierarchy::EmployeeId;

#[derive(Debug, Clone)]
pub struct Department {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct Position {
    pub id: u32,
    pub title: &'static str,
    pub department_id: u32,
    pub description: &'static str,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// Stored as a JSON document in the employee row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyContacts {
    pub contacts: Vec<EmergencyContact>,
}

impl EmergencyContacts {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{\"contacts\":[]}"))
    }
}

#[derive(Debug, Clone)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub hire_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub active: bool,
    pub department_id: u32,
    pub position_id: u32,
    pub manager_id: Option<EmployeeId>,
    pub emergency_contacts: EmergencyContacts,
    /// Empty when the employee has no note
    pub notes: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct PayrollEntry {
    pub id: u64,
    pub employee_id: EmployeeId,
    /// Rounded to cents
    pub amount: f64,
    pub pay_date: NaiveDate,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct EmployeeLicense {
    pub id: u64,
    pub employee_id: EmployeeId,
    /// Display name, e.g. `IATA Agent (Level 2)`
    pub license_name: String,
    pub level: u8,
    pub issued_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct OnCallShift {
    pub id: u64,
    pub employee_id: EmployeeId,
    pub day: DayOfWeek,
    pub start: ClockTime,
    pub end: ClockTime,
    pub escalation_order: u32,
    pub created_at: NaiveDateTime,
}
