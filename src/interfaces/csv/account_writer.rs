use crate::domain::account::Account;
use crate::error::Result;
use std::io::Write;

/// Writes the final account state as CSV.
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, accounts: &[Account]) -> Result<()> {
        self.writer
            .write_record(["id", "phone", "number", "balance"])?;
        for account in accounts {
            self.writer.write_record([
                account.id.to_string(),
                account.phone.to_string(),
                account.balance_number.to_string(),
                account.balance.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_output() {
        let mut buffer = Vec::new();
        let mut writer = AccountWriter::new(&mut buffer);
        writer
            .write_accounts(&[Account {
                id: 1,
                phone: 79_990_001_122,
                balance_number: 40_817_001,
                balance: 500,
            }])
            .unwrap();
        drop(writer);

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "id,phone,number,balance\n1,79990001122,40817001,500\n");
    }
}
