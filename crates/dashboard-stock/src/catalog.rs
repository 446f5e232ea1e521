//! Static symbol catalog
//!
//! Indian listings are kept once, keyed by base ticker; the NSE (`.NS`) and
//! BSE (`.BO`) symbols are derived from it.

use std::fmt;

/// Base tickers of the tracked Indian companies, with display names
pub const INDIAN_COMPANIES: &[(&str, &str)] = &[
    ("RELIANCE", "Reliance Industries Ltd"),
    ("TCS", "Tata Consultancy Services"),
    ("HDFCBANK", "HDFC Bank Ltd"),
    ("INFY", "Infosys Ltd"),
    ("ICICIBANK", "ICICI Bank Ltd"),
    ("HINDUNILVR", "Hindustan Unilever Ltd"),
    ("ITC", "ITC Ltd"),
    ("SBIN", "State Bank of India"),
    ("BHARTIARTL", "Bharti Airtel Ltd"),
    ("KOTAKBANK", "Kotak Mahindra Bank"),
    ("LT", "Larsen & Toubro Ltd"),
    ("AXISBANK", "Axis Bank Ltd"),
    ("MARUTI", "Maruti Suzuki India Ltd"),
    ("TITAN", "Titan Company Ltd"),
    ("WIPRO", "Wipro Ltd"),
    ("BAJFINANCE", "Bajaj Finance Ltd"),
    ("ASIANPAINT", "Asian Paints Ltd"),
    ("HCLTECH", "HCL Technologies Ltd"),
    ("ULTRACEMCO", "UltraTech Cement Ltd"),
    ("NESTLEIND", "Nestle India Ltd"),
    ("SUNPHARMA", "Sun Pharmaceutical Industries"),
    ("TATAMOTORS", "Tata Motors Ltd"),
    ("TATASTEEL", "Tata Steel Ltd"),
    ("ADANIGREEN", "Adani Green Energy Ltd"),
    ("ADANIPORTS", "Adani Ports and SEZ Ltd"),
    ("ONGC", "Oil and Natural Gas Corporation"),
    ("NTPC", "NTPC Ltd"),
    ("POWERGRID", "Power Grid Corporation"),
    ("COALINDIA", "Coal India Ltd"),
    ("JSWSTEEL", "JSW Steel Ltd"),
    ("HINDALCO", "Hindalco Industries Ltd"),
    ("VEDL", "Vedanta Ltd"),
    ("INDUSINDBK", "IndusInd Bank Ltd"),
    ("BAJAJFINSV", "Bajaj Finserv Ltd"),
    ("M&M", "Mahindra & Mahindra Ltd"),
    ("TECHM", "Tech Mahindra Ltd"),
    ("DRREDDY", "Dr. Reddys Laboratories"),
    ("CIPLA", "Cipla Ltd"),
    ("DIVISLAB", "Divi's Laboratories Ltd"),
    ("EICHERMOT", "Eicher Motors Ltd"),
    ("HEROMOTOCO", "Hero MotoCorp Ltd"),
    ("BAJAJ-AUTO", "Bajaj Auto Ltd"),
    ("GRASIM", "Grasim Industries Ltd"),
    ("BRITANNIA", "Britannia Industries Ltd"),
    ("DABUR", "Dabur India Ltd"),
    ("GODREJCP", "Godrej Consumer Products"),
    ("SHREECEM", "Shree Cement Ltd"),
    ("ADANIENT", "Adani Enterprises Ltd"),
    ("APOLLOHOSP", "Apollo Hospitals Enterprise"),
];

pub const US_STOCKS: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("TSLA", "Tesla Inc."),
    ("META", "Meta Platforms Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("JPM", "JPMorgan Chase & Co."),
    ("V", "Visa Inc."),
    ("WMT", "Walmart Inc."),
    ("JNJ", "Johnson & Johnson"),
    ("PG", "Procter & Gamble"),
    ("MA", "Mastercard"),
    ("HD", "Home Depot"),
    ("BAC", "Bank of America"),
    ("NFLX", "Netflix Inc."),
    ("DIS", "The Walt Disney Company"),
    ("ADBE", "Adobe Inc."),
    ("CRM", "Salesforce Inc."),
    ("INTC", "Intel Corporation"),
    ("AMD", "Advanced Micro Devices"),
    ("CSCO", "Cisco Systems Inc."),
    ("PEP", "PepsiCo Inc."),
    ("KO", "The Coca-Cola Company"),
    ("ORCL", "Oracle Corporation"),
    ("NKE", "Nike Inc."),
    ("MCD", "McDonald's Corporation"),
    ("PYPL", "PayPal Holdings Inc."),
    ("ABT", "Abbott Laboratories"),
    ("CVX", "Chevron Corporation"),
    ("PFE", "Pfizer Inc."),
    ("TMO", "Thermo Fisher Scientific"),
    ("COST", "Costco Wholesale"),
    ("AVGO", "Broadcom Inc."),
    ("UNH", "UnitedHealth Group"),
    ("XOM", "Exxon Mobil Corporation"),
    ("LLY", "Eli Lilly and Company"),
    ("ABBV", "AbbVie Inc."),
    ("ACN", "Accenture plc"),
    ("TXN", "Texas Instruments"),
    ("QCOM", "QUALCOMM Incorporated"),
    ("WFC", "Wells Fargo & Company"),
    ("IBM", "IBM Corporation"),
    ("GS", "Goldman Sachs Group"),
    ("UBER", "Uber Technologies Inc."),
    ("SBUX", "Starbucks Corporation"),
    ("NOW", "ServiceNow Inc."),
    ("BKNG", "Booking Holdings Inc."),
    ("BA", "Boeing Company"),
    ("CAT", "Caterpillar Inc."),
];

pub const CRYPTO: &[(&str, &str)] = &[
    ("BTC-USD", "Bitcoin"),
    ("ETH-USD", "Ethereum"),
    ("BNB-USD", "Binance Coin"),
    ("XRP-USD", "Ripple"),
    ("ADA-USD", "Cardano"),
    ("DOGE-USD", "Dogecoin"),
    ("SOL-USD", "Solana"),
    ("MATIC-USD", "Polygon"),
];

/// Major indices shown in the market overview
pub const MARKET_INDICES: &[(&str, &str)] = &[
    ("^NSEI", "NIFTY 50"),
    ("^BSESN", "SENSEX"),
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^IXIC", "NASDAQ"),
];

/// Exchange or asset class of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    Nse,
    Bse,
    Us,
    Crypto,
    Index,
}

impl Market {
    /// Classify a symbol by its suffix or prefix.
    ///
    /// Anything without a recognised marker is treated as a US listing.
    pub fn of(symbol: &str) -> Self {
        let symbol = symbol.trim().to_uppercase();
        if symbol.ends_with(".NS") {
            Self::Nse
        } else if symbol.ends_with(".BO") {
            Self::Bse
        } else if symbol.starts_with('^') {
            Self::Index
        } else if symbol.ends_with("-USD") {
            Self::Crypto
        } else {
            Self::Us
        }
    }

    pub fn is_indian(&self) -> bool {
        matches!(self, Self::Nse | Self::Bse)
    }

    /// Currency symbol used when printing prices
    pub fn currency(&self) -> &'static str {
        if self.is_indian() { "₹" } else { "$" }
    }

    /// `(symbol, name)` pairs listed for this market
    pub fn listings(&self) -> Vec<(String, &'static str)> {
        match self {
            Self::Nse => indian_listings(".NS"),
            Self::Bse => indian_listings(".BO"),
            Self::Us => owned(US_STOCKS),
            Self::Crypto => owned(CRYPTO),
            Self::Index => owned(MARKET_INDICES),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nse => "NSE (India)",
            Self::Bse => "BSE (India)",
            Self::Us => "US Markets",
            Self::Crypto => "Crypto",
            Self::Index => "Indices",
        };
        f.write_str(name)
    }
}

fn indian_listings(suffix: &str) -> Vec<(String, &'static str)> {
    INDIAN_COMPANIES
        .iter()
        .map(|(base, name)| (format!("{base}{suffix}"), *name))
        .collect()
}

fn owned(table: &[(&str, &'static str)]) -> Vec<(String, &'static str)> {
    table.iter().map(|(s, n)| ((*s).to_string(), *n)).collect()
}

/// Display name for a known symbol
pub fn company_name(symbol: &str) -> Option<&'static str> {
    let symbol = symbol.trim().to_uppercase();
    match Market::of(&symbol) {
        Market::Nse | Market::Bse => lookup(INDIAN_COMPANIES, &symbol[..symbol.len() - 3]),
        Market::Us => lookup(US_STOCKS, &symbol),
        Market::Crypto => lookup(CRYPTO, &symbol),
        Market::Index => lookup(MARKET_INDICES, &symbol),
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(s, _)| *s == key).map(|(_, name)| *name)
}

/// Display name, falling back to the symbol itself
pub fn display_name(symbol: &str) -> String {
    company_name(symbol).map_or_else(|| symbol.to_string(), str::to_string)
}
