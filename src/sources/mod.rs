// One module per upstream feed: typed records plus a decode entry point
// whose errors name the source.

pub mod cdc;
pub mod counties;
