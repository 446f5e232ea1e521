//! Fixed reply texts

pub const ASK_PRICE_SYMBOL: &str = "💬 Which stock would you like to know the price of? Please mention the stock symbol (e.g., AAPL, RELIANCE.NS, TCS.NS)";

pub const ASK_ANALYSIS_SYMBOL: &str =
    "💬 Which stock would you like me to analyze? Please provide the stock symbol.";

pub const ASK_RECOMMENDATION_SYMBOL: &str =
    "💬 Which stock are you considering? Please mention the stock symbol.";

pub const COMPARISON_USAGE: &str = r#"💬 To compare stocks, please mention at least 2 symbols.

**Examples:**
• "Compare AAPL and MSFT"
• "TCS vs INFY"
• "Compare RELIANCE.NS with HDFCBANK.NS"
"#;

pub const DISCLAIMER: &str = r"

⚠️ **Important Disclaimer:**
This is AI-generated educational content only. I am not a financial advisor.
Always:
• Do your own research
• Consult with a licensed financial advisor
• Consider your risk tolerance
• Diversify your portfolio
• Never invest money you can't afford to lose
";

pub const MARKET_OVERVIEW: &str = r#"
📊 **Market Overview**

**Indian Markets:**
🇮🇳 NIFTY 50 - Indian benchmark index
🇮🇳 SENSEX - Bombay Stock Exchange index

**US Markets:**
🇺🇸 S&P 500 - US large-cap index
🇺🇸 NASDAQ - Tech-heavy index
🇺🇸 DOW JONES - Industrial average

**Market Hours:**
• Indian Markets: 9:15 AM - 3:30 PM IST
• US Markets: 9:30 AM - 4:00 PM EST

Would you like to check specific stocks or indices?

**Try asking:**
• "What's the price of RELIANCE.NS?"
• "Analyze TCS"
• "Compare INFY and WIPRO"
"#;

pub const TOP_INDIAN_STOCKS: &str = r"
📈 **Top Indian Stocks to Watch:**

**Technology:**
🖥️ TCS.NS - Tata Consultancy Services
🖥️ INFY.NS - Infosys
🖥️ WIPRO.NS - Wipro

**Banking:**
🏦 HDFCBANK.NS - HDFC Bank
🏦 ICICIBANK.NS - ICICI Bank
🏦 SBIN.NS - State Bank of India

**Conglomerate:**
🏭 RELIANCE.NS - Reliance Industries
🏭 LT.NS - Larsen & Toubro

**FMCG:**
🛒 HINDUNILVR.NS - Hindustan Unilever
🛒 ITC.NS - ITC Limited

Would you like me to analyze any of these stocks?
";

pub const TOP_US_STOCKS: &str = r"
📈 **Top US Tech Stocks:**

**Mega Cap:**
🍎 AAPL - Apple Inc.
🪟 MSFT - Microsoft
🔍 GOOGL - Alphabet (Google)
📦 AMZN - Amazon

**AI & Chips:**
🎮 NVDA - NVIDIA
💻 AMD - Advanced Micro Devices

**EV & Innovation:**
⚡ TSLA - Tesla
🚀 META - Meta Platforms

Would you like me to analyze any of these stocks?
";

pub const NEWS: &str = r#"
📰 **Market News & Updates**

For the latest market news, I recommend:

**Indian Markets:**
• Economic Times - economictimes.com
• MoneyControl - moneycontrol.com
• NSE India - nseindia.com

**US Markets:**
• Bloomberg - bloomberg.com
• CNBC - cnbc.com
• Yahoo Finance - finance.yahoo.com

💡 **Tip:** I can analyze any stock for you in real-time!

Try asking:
• "What's the price of AAPL?"
• "Analyze RELIANCE.NS"
• "Should I buy TCS?"
"#;

pub const HELP: &str = r#"
🤖 **Stock Chatbot - I can help you with:**

📊 **Stock Prices:**
• "What's the price of AAPL?"
• "How much is RELIANCE.NS trading at?"

📈 **Stock Analysis:**
• "Analyze TCS"
• "Give me analysis of MSFT"

💡 **Recommendations:**
• "Should I buy INFY?"
• "Is AAPL a good investment?"

🔄 **Comparisons:**
• "Compare AAPL and MSFT"
• "TCS vs INFY"

🏆 **Top Stocks:**
• "Show me top Indian stocks"
• "Best US tech stocks"

📰 **Market Info:**
• "Market overview"
• "Latest news"

💬 **Just ask me anything about stocks!**

**Example Questions:**
• "What's the price of Tesla?"
• "Analyze RELIANCE"
• "Should I buy Apple stock?"
• "Compare Google and Microsoft"

⚠️ Remember: This is educational content, not financial advice!
"#;

pub const FALLBACK: &str = r#"
💬 I'm not sure I understood that.

🤖 **I can help you with:**
• Stock prices ("What's the price of AAPL?")
• Stock analysis ("Analyze RELIANCE.NS")
• Buy/Sell recommendations ("Should I buy TCS?")
• Stock comparisons ("Compare INFY and WIPRO")
• Market information ("Market overview")

Type "help" to see all available commands!

Or just ask me anything about stocks! 📊
"#;

/// Words that steer the top-stocks reply to the Indian list
pub const INDIAN_MARKERS: [&str; 3] = ["indian", "india", "nse"];
