use crate::model::{DiagnosticTest, Vendor};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        render(&self.rows)
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
pub struct TestRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Vendor")]
    pub vendor: String,
    #[tabled(rename = "Category")]
    pub category: String,
}

impl From<&DiagnosticTest> for TestRow {
    fn from(test: &DiagnosticTest) -> Self {
        Self {
            id: test.id.clone(),
            name: test.name().to_string(),
            vendor: test.vendor().to_string(),
            category: test.category.code().to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct VendorRow {
    #[tabled(rename = "Vendor")]
    pub name: String,
    #[tabled(rename = "Tests")]
    pub tests: usize,
    #[tabled(rename = "Verified")]
    pub verified: usize,
    #[tabled(rename = "Contributions")]
    pub contributions: usize,
    #[tabled(rename = "Assistance")]
    pub assistance: String,
}

impl From<&Vendor> for VendorRow {
    fn from(vendor: &Vendor) -> Self {
        Self {
            name: vendor.name.clone(),
            tests: vendor.test_count,
            verified: vendor.verified_test_count,
            contributions: vendor.contribution_count,
            assistance: if vendor.has_assistance_program { "yes" } else { "" }.to_string(),
        }
    }
}

pub fn tests_table(tests: &[DiagnosticTest]) -> String {
    render(&tests.iter().map(TestRow::from).collect::<Vec<_>>())
}

pub fn vendors_table(vendors: &[Vendor]) -> String {
    render(&vendors.iter().map(VendorRow::from).collect::<Vec<_>>())
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_renders_nothing() {
        assert!(TableBuilder::new().build().is_empty());
        assert!(tests_table(&[]).is_empty());
    }

    #[test]
    fn test_stats_table_contains_rows() {
        let table = stats_table(&[("Tests", "6"), ("Vendors", "5")]);
        assert!(table.contains("Metric"));
        assert!(table.contains("Vendors"));
        assert!(table.contains('6'));
    }
}
