//! Column names of the roster sheets.
//!
//! Every column has a canonical English name, which is what the writers emit,
//! plus the aliases used by the HR system's Chinese-language exports.

/// A named column and the header texts it may appear under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Canonical header, written by the CSV writers.
    pub name: &'static str,
    /// Other accepted headers.
    pub aliases: &'static [&'static str],
}

impl Column {
    const fn new(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases }
    }

    /// Returns true if `header` names this column. Comparison ignores
    /// surrounding whitespace, a UTF-8 byte order mark and ASCII case.
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim_start_matches('\u{feff}').trim();
        header.eq_ignore_ascii_case(self.name)
            || self.aliases.iter().any(|alias| header.eq_ignore_ascii_case(alias))
    }

    /// Finds this column among `headers`.
    pub fn locate(&self, headers: &csv::StringRecord) -> Option<usize> {
        headers.iter().position(|header| self.matches(header))
    }
}

pub const EMPLOYEE_ID: Column = Column::new("employee_id", &["工号", "employee id"]);
pub const NAME: Column = Column::new("name", &["姓名"]);
pub const ORG_LEVEL_1: Column = Column::new("org_level_1", &["一级组织"]);
pub const ORG_LEVEL_2: Column = Column::new("org_level_2", &["二级组织"]);
pub const ORG_LEVEL_3: Column = Column::new("org_level_3", &["三级组织"]);
pub const ORG_LEVEL_4: Column = Column::new("org_level_4", &["四级组织"]);
pub const HIRE_DATE: Column = Column::new("hire_date", &["入职日期"]);
pub const LEAVE_DATE: Column = Column::new("leave_date", &["离职日期"]);
pub const TRANSFER_OUT_DATE: Column = Column::new("transfer_out_date", &["调离日期"]);
pub const TRANSFER_IN_DATE: Column = Column::new("transfer_in_date", &["调入日期"]);
pub const CROSS_ORG_TRANSFER: Column = Column::new("cross_org_transfer", &["跨组织调转"]);

/// The resigned roster carries the leave date as the last working day.
pub const RESIGNED_LEAVE_DATE: Column = Column::new(
    "leave_date",
    &["离职日期", "最后工作日", "last_working_day", "last working day"],
);

/// The resigned roster names organization level 4 "department".
pub const RESIGNED_ORG_LEVEL_4: Column =
    Column::new("org_level_4", &["四级组织", "部门", "department"]);

pub const TRANSFER_DATE: Column = Column::new("transfer_date", &["调动日期"]);
pub const BEFORE_LEVEL_1: Column = Column::new("before_level_1", &["调动前一级组织"]);
pub const BEFORE_LEVEL_2: Column = Column::new("before_level_2", &["调动前二级组织"]);
pub const BEFORE_LEVEL_3: Column = Column::new("before_level_3", &["调动前三级组织"]);
pub const BEFORE_LEVEL_4: Column = Column::new("before_level_4", &["调动前部门", "调动前四级组织"]);
pub const AFTER_LEVEL_1: Column = Column::new("after_level_1", &["调动后一级组织"]);
pub const AFTER_LEVEL_2: Column = Column::new("after_level_2", &["调动后二级组织"]);
pub const AFTER_LEVEL_3: Column = Column::new("after_level_3", &["调动后三级组织"]);
pub const AFTER_LEVEL_4: Column = Column::new("after_level_4", &["调动后部门", "调动后四级组织"]);

pub const MONTHS: Column = Column::new("months", &["计算月数"]);
pub const AMOUNT: Column = Column::new("amount", &["年度经费"]);
pub const STATUS: Column = Column::new("status", &[]);

/// Header order of reconciled-period and fee-sheet exports.
pub const RECORD_COLUMNS: [Column; 11] = [
    NAME,
    EMPLOYEE_ID,
    ORG_LEVEL_1,
    ORG_LEVEL_2,
    ORG_LEVEL_3,
    ORG_LEVEL_4,
    HIRE_DATE,
    LEAVE_DATE,
    TRANSFER_OUT_DATE,
    TRANSFER_IN_DATE,
    CROSS_ORG_TRANSFER,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_canonical_and_alias() {
        assert!(EMPLOYEE_ID.matches("employee_id"));
        assert!(EMPLOYEE_ID.matches(" 工号 "));
        assert!(EMPLOYEE_ID.matches("Employee_ID"));
        assert!(!EMPLOYEE_ID.matches("name"));
    }

    #[test]
    fn test_matches_ignores_byte_order_mark() {
        assert!(NAME.matches("\u{feff}姓名"));
    }

    #[test]
    fn test_resigned_aliases() {
        assert!(RESIGNED_LEAVE_DATE.matches("最后工作日"));
        assert!(RESIGNED_LEAVE_DATE.matches("leave_date"));
        assert!(RESIGNED_ORG_LEVEL_4.matches("部门"));
        assert!(!LEAVE_DATE.matches("最后工作日"));
    }

    #[test]
    fn test_locate() {
        let headers = csv::StringRecord::from(vec!["姓名", "工号", "入职日期"]);
        assert_eq!(EMPLOYEE_ID.locate(&headers), Some(1));
        assert_eq!(HIRE_DATE.locate(&headers), Some(2));
        assert_eq!(LEAVE_DATE.locate(&headers), None);
    }
}
