//! Application Configuration

use crate::domain::entities::TicketKind;

/// Ticket pricing configuration
#[derive(Debug, Clone)]
pub struct TicketConfig {
    pub general_price_cents: i64,
    pub student_price_cents: i64,
    pub sponsor_price_cents: i64,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            general_price_cents: 15_000,
            student_price_cents: 5_000,
            sponsor_price_cents: 100_000,
        }
    }
}

impl TicketConfig {
    /// Price for a ticket kind
    pub fn price_for(&self, kind: TicketKind) -> i64 {
        match kind {
            TicketKind::General => self.general_price_cents,
            TicketKind::Student => self.student_price_cents,
            TicketKind::Sponsor => self.sponsor_price_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prices() {
        let config = TicketConfig::default();

        assert_eq!(config.price_for(TicketKind::General), 15_000);
        assert_eq!(config.price_for(TicketKind::Student), 5_000);
        assert_eq!(config.price_for(TicketKind::Sponsor), 100_000);
    }
}
