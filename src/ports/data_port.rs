//! History loading port trait.
//!
//! All data fetching happens before the calculators run; the core itself
//! never performs I/O.

use crate::domain::bar::Bar;
use crate::domain::equity::EquityPoint;
use crate::domain::error::RetrospectError;
use crate::domain::trade::Trade;

pub trait DataPort {
    fn load_bars(&self) -> Result<Vec<Bar>, RetrospectError>;

    fn load_equity_curve(&self) -> Result<Vec<EquityPoint>, RetrospectError>;

    fn load_trades(&self) -> Result<Vec<Trade>, RetrospectError>;
}
