//! Table layouts for the generated records.

use generator::records::{
    Department, Employee, EmployeeLicense, OnCallShift, PayrollEntry, Position,
};

use crate::sql::SqlValue;

/// A record that maps onto one row of a SQL table.
pub trait SqlRow {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Column holding the explicit primary key, used for the sequence reset
    const ID_COLUMN: &'static str;

    fn values(&self) -> Vec<SqlValue>;
}

impl SqlRow for Department {
    const TABLE: &'static str = "department";
    const COLUMNS: &'static [&'static str] = &["department_id", "name", "description", "created_at"];
    const ID_COLUMN: &'static str = "department_id";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            SqlValue::text(self.name),
            SqlValue::text(self.description),
            SqlValue::timestamp(self.created_at),
        ]
    }
}

impl SqlRow for Position {
    const TABLE: &'static str = "position";
    const COLUMNS: &'static [&'static str] = &[
        "position_id",
        "title",
        "department_id",
        "description",
        "created_at",
    ];
    const ID_COLUMN: &'static str = "position_id";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            SqlValue::text(self.title),
            self.department_id.into(),
            SqlValue::text(self.description),
            SqlValue::timestamp(self.created_at),
        ]
    }
}

impl SqlRow for Employee {
    const TABLE: &'static str = "employee";
    const COLUMNS: &'static [&'static str] = &[
        "employee_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "address",
        "birth_date",
        "hire_date",
        "termination_date",
        "active",
        "department_id",
        "position_id",
        "manager_id",
        "emergency_contacts",
        "notes",
        "created_at",
    ];
    const ID_COLUMN: &'static str = "employee_id";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            SqlValue::text(&self.first_name),
            SqlValue::text(&self.last_name),
            SqlValue::text(&self.email),
            SqlValue::text(&self.phone),
            SqlValue::text(&self.address),
            SqlValue::date(self.birth_date),
            SqlValue::date(self.hire_date),
            SqlValue::optional(self.termination_date, SqlValue::date),
            self.active.into(),
            self.department_id.into(),
            self.position_id.into(),
            SqlValue::optional(self.manager_id, SqlValue::from),
            SqlValue::text(self.emergency_contacts.to_json()),
            SqlValue::text(&self.notes),
            SqlValue::timestamp(self.created_at),
        ]
    }
}

impl SqlRow for PayrollEntry {
    const TABLE: &'static str = "payroll";
    const COLUMNS: &'static [&'static str] = &[
        "payroll_id",
        "employee_id",
        "amount",
        "pay_date",
        "notes",
        "created_at",
    ];
    const ID_COLUMN: &'static str = "payroll_id";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.employee_id.into(),
            SqlValue::Amount(self.amount),
            SqlValue::date(self.pay_date),
            SqlValue::text(&self.notes),
            SqlValue::timestamp(self.created_at),
        ]
    }
}

impl SqlRow for EmployeeLicense {
    const TABLE: &'static str = "employee_license";
    const COLUMNS: &'static [&'static str] = &[
        "license_id",
        "employee_id",
        "license_name",
        "license_level",
        "issued_date",
        "expiry_date",
        "notes",
        "created_at",
    ];
    const ID_COLUMN: &'static str = "license_id";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.employee_id.into(),
            SqlValue::text(&self.license_name),
            self.level.into(),
            SqlValue::date(self.issued_date),
            SqlValue::date(self.expiry_date),
            SqlValue::text(&self.notes),
            SqlValue::timestamp(self.created_at),
        ]
    }
}

impl SqlRow for OnCallShift {
    const TABLE: &'static str = "oncall_shift";
    const COLUMNS: &'static [&'static str] = &[
        "shift_id",
        "employee_id",
        "day_of_week",
        "start_time",
        "end_time",
        "escalation_order",
        "created_at",
    ];
    const ID_COLUMN: &'static str = "shift_id";

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.employee_id.into(),
            self.day.number().into(),
            SqlValue::text(self.start.to_string()),
            SqlValue::text(self.end.to_string()),
            self.escalation_order.into(),
            SqlValue::timestamp(self.created_at),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use generator::records::{EmergencyContact, EmergencyContacts};
    use generator::{ClockTime, DayOfWeek};

    fn created_at() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 4, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    fn employee() -> Employee {
        Employee {
            id: 123_456_789,
            first_name: "Liam".to_string(),
            last_name: "O'Neil".to_string(),
            email: "liam.o'neil@gmail.com".to_string(),
            phone: "+12025550100".to_string(),
            address: "12 Oak St.".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(),
            hire_date: NaiveDate::from_ymd_opt(2021, 5, 6).unwrap(),
            termination_date: None,
            active: true,
            department_id: 3,
            position_id: 6,
            manager_id: None,
            emergency_contacts: EmergencyContacts {
                contacts: vec![EmergencyContact {
                    name: "Ava Kim".to_string(),
                    phone: "+13035550100".to_string(),
                }],
            },
            notes: String::new(),
            created_at: created_at(),
        }
    }

    #[test]
    fn test_columns_match_values() {
        let employee = employee();
        assert_eq!(employee.values().len(), Employee::COLUMNS.len());
    }

    #[test]
    fn test_employee_row_rendering() {
        let rendered: Vec<String> = employee().values().iter().map(|v| v.to_string()).collect();

        assert_eq!(rendered[0], "123456789");
        assert_eq!(rendered[2], "'O''Neil'");
        assert_eq!(rendered[8], "NULL");
        assert_eq!(rendered[9], "true");
        assert_eq!(rendered[12], "NULL");
        assert_eq!(
            rendered[13],
            r#"'{"contacts":[{"name":"Ava Kim","phone":"+13035550100"}]}'"#
        );
        assert_eq!(rendered[14], "''");
        assert_eq!(rendered[15], "'2023-04-01 12:30'");
    }

    #[test]
    fn test_manager_is_rendered_as_integer() {
        let mut employee = employee();
        employee.manager_id = Some(987_654_321);
        employee.termination_date = NaiveDate::from_ymd_opt(2022, 1, 1);
        employee.active = false;

        let rendered: Vec<String> = employee.values().iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered[8], "'2022-01-01'");
        assert_eq!(rendered[9], "false");
        assert_eq!(rendered[12], "987654321");
    }

    #[test]
    fn test_shift_row_rendering() {
        let shift = OnCallShift {
            id: 7,
            employee_id: 123_456_789,
            day: DayOfWeek::Wednesday,
            start: ClockTime::new(6, 15).unwrap(),
            end: ClockTime::new(10, 15).unwrap(),
            escalation_order: 2,
            created_at: created_at(),
        };

        let rendered: Vec<String> = shift.values().iter().map(|v| v.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "7",
                "123456789",
                "3",
                "'06:15'",
                "'10:15'",
                "2",
                "'2023-04-01 12:30'"
            ]
        );
        assert_eq!(shift.values().len(), OnCallShift::COLUMNS.len());
    }

    #[test]
    fn test_payroll_amount_has_two_decimals() {
        let entry = PayrollEntry {
            id: 1,
            employee_id: 5,
            amount: 1500.5,
            pay_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            notes: "Under NDA".to_string(),
            created_at: created_at(),
        };

        assert_eq!(entry.values()[2].to_string(), "1500.50");
        assert_eq!(entry.values().len(), PayrollEntry::COLUMNS.len());
    }
}
