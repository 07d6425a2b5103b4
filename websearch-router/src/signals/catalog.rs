//! Built-in signal tables.
//!
//! Weights are fixed constants. Higher weight means a stronger pull towards
//! the category's provider. Order within a table is the order evidence is
//! reported in.

use super::{IntentCategory, SignalPattern};

const fn s(pattern: &'static str, weight: f64) -> SignalPattern {
    SignalPattern::new(pattern, weight)
}

const fn guarded(pattern: &'static str, weight: f64, guard: &'static str) -> SignalPattern {
    SignalPattern::guarded(pattern, weight, guard)
}

/// Table for `category`.
pub fn table(category: IntentCategory) -> &'static [SignalPattern] {
    match category {
        IntentCategory::Shopping => SHOPPING,
        IntentCategory::Research => RESEARCH,
        IntentCategory::Discovery => DISCOVERY,
        IntentCategory::LocalNews => LOCAL_NEWS,
        IntentCategory::Rag => RAG,
        IntentCategory::Privacy => PRIVACY,
    }
}

pub const SHOPPING: &[SignalPattern] = &[
    // price
    s(r"\bhow much\b", 4.0),
    s(r"\bprice of\b", 4.0),
    s(r"\bcost of\b", 4.0),
    s(r"\bprices?\b", 3.0),
    s(r"\$\d+|\d+\s*dollars?", 3.0),
    s(r"€\d+|\d+\s*euros?", 3.0),
    s(r"£\d+|\d+\s*pounds?", 3.0),
    s(r"\bpreis(e)?\b", 3.5),
    s(r"\bkosten\b", 3.0),
    s(r"\bwieviel\b", 3.5),
    s(r"\bwie viel\b", 3.5),
    s(r"\bwas kostet\b", 4.0),
    // purchase intent
    s(r"\bbuy\b", 3.5),
    s(r"\bpurchase\b", 3.5),
    guarded(r"\border\b", 3.0, r"\s+by"),
    s(r"\bshopping\b", 3.5),
    s(r"\bshop for\b", 3.5),
    s(r"\bwhere to (buy|get|purchase)\b", 4.0),
    s(r"\bkaufen\b", 3.5),
    s(r"\bbestellen\b", 3.5),
    s(r"\bwo kaufen\b", 4.0),
    s(r"\bhändler\b", 3.0),
    s(r"\bshop\b", 2.5),
    // deals
    s(r"\bdeal(s)?\b", 3.0),
    s(r"\bdiscount(s)?\b", 3.0),
    s(r"\bsale\b", 2.5),
    s(r"\bcheap(er|est)?\b", 3.0),
    s(r"\baffordable\b", 2.5),
    s(r"\bbudget\b", 2.5),
    s(r"\bbest price\b", 3.5),
    s(r"\bcompare prices\b", 3.5),
    s(r"\bcoupon\b", 3.0),
    s(r"\bgünstig(er|ste)?\b", 3.0),
    s(r"\bbillig(er|ste)?\b", 3.0),
    s(r"\bangebot(e)?\b", 3.0),
    s(r"\brabatt\b", 3.0),
    s(r"\baktion\b", 2.5),
    s(r"\bschnäppchen\b", 3.0),
    // product comparison
    s(r"\bvs\.?\b", 2.0),
    s(r"\bversus\b", 2.0),
    s(r"\bor\b.*\bwhich\b", 2.0),
    s(r"\bspecs?\b", 2.5),
    s(r"\bspecifications?\b", 2.5),
    s(r"\breview(s)?\b", 2.0),
    s(r"\brating(s)?\b", 2.0),
    s(r"\bunboxing\b", 2.5),
    s(r"\btest\b", 2.5),
    s(r"\bbewertung(en)?\b", 2.5),
    s(r"\btechnische daten\b", 3.0),
    s(r"\bspezifikationen\b", 2.5),
    // model generation followed by a tier ("16 pro", "s24 ultra")
    s(r"\b[a-z]?\d{1,4}\s*(pro|max|plus|ultra|mini|lite)\b", 2.5),
];

pub const RESEARCH: &[SignalPattern] = &[
    // explanation
    s(r"\bhow does\b", 4.0),
    s(r"\bhow do\b", 3.5),
    s(r"\bwhy does\b", 4.0),
    s(r"\bwhy do\b", 3.5),
    s(r"\bwhy is\b", 3.5),
    s(r"\bexplain\b", 4.0),
    s(r"\bexplanation\b", 4.0),
    s(r"\bwhat is\b", 3.0),
    s(r"\bwhat are\b", 3.0),
    s(r"\bdefine\b", 3.5),
    s(r"\bdefinition of\b", 3.5),
    s(r"\bmeaning of\b", 3.0),
    // analysis
    s(r"\banalyze\b", 3.5),
    s(r"\banalysis\b", 3.5),
    guarded(r"\bcompare\b", 3.0, r"\s*prices?"),
    s(r"\bcomparison\b", 3.0),
    s(r"\bpros and cons\b", 4.0),
    s(r"\badvantages?\b", 3.0),
    s(r"\bdisadvantages?\b", 3.0),
    s(r"\bbenefits?\b", 2.5),
    s(r"\bdrawbacks?\b", 3.0),
    s(r"\bdifference between\b", 3.5),
    // learning
    s(r"\bunderstand\b", 3.0),
    s(r"\blearn(ing)?\b", 2.5),
    s(r"\btutorial\b", 3.0),
    s(r"\bguide\b", 2.5),
    s(r"\bhow to\b", 2.0),
    s(r"\bstep by step\b", 3.0),
    // depth
    s(r"\bin[- ]depth\b", 3.0),
    s(r"\bdetailed\b", 2.5),
    s(r"\bcomprehensive\b", 3.0),
    s(r"\bthorough\b", 2.5),
    s(r"\bdeep dive\b", 3.5),
    s(r"\boverall\b", 2.0),
    s(r"\bsummary\b", 2.0),
    // academic
    s(r"\bstudy\b", 2.5),
    s(r"\bresearch shows\b", 3.5),
    s(r"\baccording to\b", 2.5),
    s(r"\bevidence\b", 3.0),
    s(r"\bscientific\b", 3.0),
    s(r"\bhistory of\b", 3.0),
    s(r"\bbackground\b", 2.5),
    s(r"\bcontext\b", 2.5),
    s(r"\bimplications?\b", 3.0),
    // German
    s(r"\bwie funktioniert\b", 4.0),
    s(r"\bwarum\b", 3.5),
    s(r"\berklär(en|ung)?\b", 4.0),
    s(r"\bwas ist\b", 3.0),
    s(r"\bwas sind\b", 3.0),
    s(r"\bbedeutung\b", 3.0),
    s(r"\banalyse\b", 3.5),
    s(r"\bvergleich(en)?\b", 3.0),
    s(r"\bvor- und nachteile\b", 4.0),
    s(r"\bvorteile\b", 3.0),
    s(r"\bnachteile\b", 3.0),
    s(r"\bunterschied(e)?\b", 3.5),
    s(r"\bverstehen\b", 3.0),
    s(r"\blernen\b", 2.5),
    s(r"\banleitung\b", 3.0),
    s(r"\bübersicht\b", 2.5),
    s(r"\bhintergrund\b", 2.5),
    s(r"\bzusammenfassung\b", 2.5),
];

pub const DISCOVERY: &[SignalPattern] = &[
    // similarity
    s(r"\bsimilar to\b", 5.0),
    s(r"\blike\s+\w+\.com", 4.5),
    s(r"\balternatives? to\b", 5.0),
    s(r"\bcompetitors? (of|to)\b", 4.5),
    s(r"\bcompeting with\b", 4.0),
    s(r"\brivals? (of|to)\b", 4.0),
    s(r"\binstead of\b", 3.0),
    s(r"\breplacement for\b", 3.5),
    // companies and startups
    s(r"\bcompanies (like|that|doing|building)\b", 4.5),
    s(r"\bstartups? (like|that|doing|building)\b", 4.5),
    s(r"\bwho else\b", 4.0),
    s(r"\bother (companies|startups|tools|apps)\b", 3.5),
    s(r"\bfind (companies|startups|tools)\b", 4.0),
    // funding
    s(r"\bseries [a-d]\b", 4.0),
    s(r"\byc\b|y combinator", 4.0),
    s(r"\bfund(ed|ing|raise)\b", 3.5),
    s(r"\bventure\b", 3.0),
    s(r"\bvaluation\b", 3.0),
    // content categories
    s(r"\bresearch papers? (on|about)\b", 4.0),
    s(r"\barxiv\b", 4.5),
    s(r"\bgithub (projects?|repos?)\b", 4.5),
    s(r"\bopen source\b.*\bprojects?\b", 4.0),
    s(r"\btweets? (about|on)\b", 3.5),
    s(r"\bblogs? (about|on|like)\b", 3.0),
];

pub const LOCAL_NEWS: &[SignalPattern] = &[
    // local
    s(r"\bnear me\b", 4.0),
    s(r"\bnearby\b", 3.5),
    s(r"\blocal\b", 3.0),
    s(r"\bin (my )?(city|area|town|neighborhood)\b", 3.5),
    s(r"\brestaurants?\b", 2.5),
    s(r"\bhotels?\b", 2.5),
    s(r"\bcafes?\b", 2.5),
    s(r"\bstores?\b", 2.0),
    s(r"\bdirections? to\b", 3.5),
    s(r"\bmap of\b", 3.0),
    s(r"\bphone number\b", 3.0),
    s(r"\baddress of\b", 3.0),
    s(r"\bopen(ing)? hours\b", 3.0),
    // weather and time
    s(r"\bweather\b", 4.0),
    s(r"\bforecast\b", 3.5),
    s(r"\btemperature\b", 3.0),
    s(r"\btime in\b", 3.0),
    // news
    s(r"\blatest\b", 2.5),
    s(r"\brecent\b", 2.5),
    s(r"\btoday\b", 2.5),
    s(r"\bbreaking\b", 3.5),
    s(r"\bnews\b", 2.5),
    s(r"\bheadlines?\b", 3.0),
    s(r"\b202[4-9]\b", 2.0),
    s(r"\blast (week|month|year)\b", 2.0),
];

pub const RAG: &[SignalPattern] = &[
    // context for language models
    s(r"\brag\b", 4.5),
    s(r"\bcontext for\b", 4.0),
    s(r"\bsummarize\b", 3.5),
    s(r"\bbrief(ly)?\b", 3.0),
    s(r"\bquick overview\b", 3.5),
    s(r"\btl;?dr\b", 4.0),
    s(r"\bkey (points|facts|info)\b", 3.5),
    s(r"\bmain (points|takeaways)\b", 3.5),
    // combined web and news
    s(r"\b(web|online)\s+and\s+news\b", 4.0),
    s(r"\ball sources\b", 3.5),
    s(r"\bcomprehensive (search|overview)\b", 3.5),
    s(r"\blatest\s+(news|updates)\b", 3.0),
    s(r"\bcurrent (events|situation|status)\b", 3.5),
    // real time
    s(r"\bright now\b", 3.0),
    s(r"\bas of today\b", 3.5),
    s(r"\bup.to.date\b", 3.5),
    s(r"\breal.time\b", 4.0),
    s(r"\blive\b", 2.5),
    // synthesis
    s(r"\bwhat'?s happening with\b", 3.5),
    s(r"\bwhat'?s the latest\b", 4.0),
    s(r"\bupdates?\s+on\b", 3.5),
    s(r"\bstatus of\b", 3.0),
    s(r"\bsituation (in|with|around)\b", 3.5),
];

pub const PRIVACY: &[SignalPattern] = &[
    // privacy
    s(r"\bprivate(ly)?\b", 4.0),
    s(r"\banonymous(ly)?\b", 4.0),
    s(r"\bwithout tracking\b", 4.5),
    s(r"\bno track(ing)?\b", 4.5),
    s(r"\bprivacy\b", 3.5),
    s(r"\bprivacy.?focused\b", 4.5),
    s(r"\bprivacy.?first\b", 4.5),
    s(r"\bduckduckgo alternative\b", 4.5),
    s(r"\bprivate search\b", 5.0),
    s(r"\bprivat\b", 4.0),
    s(r"\banonym\b", 4.0),
    s(r"\bohne tracking\b", 4.5),
    s(r"\bdatenschutz\b", 4.0),
    // multi-source aggregation
    s(r"\baggregate results?\b", 4.0),
    s(r"\bmultiple sources?\b", 4.0),
    s(r"\bdiverse (results|perspectives|sources)\b", 4.0),
    s(r"\bfrom (all|multiple|different) (engines?|sources?)\b", 4.5),
    s(r"\bmeta.?search\b", 5.0),
    s(r"\ball engines?\b", 4.0),
    s(r"\bverschiedene quellen\b", 4.0),
    s(r"\baus mehreren quellen\b", 4.0),
    s(r"\balle suchmaschinen\b", 4.5),
    // zero API cost
    s(r"\bfree search\b", 3.5),
    s(r"\bno api cost\b", 4.0),
    s(r"\bself.?hosted search\b", 5.0),
    s(r"\bzero cost\b", 3.5),
    guarded(r"\bbudget\b", 2.5, r"\s*(laptop|phone|option)"),
    s(r"\bkostenlos(e)?\s+suche\b", 3.5),
    s(r"\bkeine api.?kosten\b", 4.0),
];

/// Recency patterns; their sum is the recency score.
pub const RECENCY: &[SignalPattern] = &[
    s(r"\b(latest|newest|recent|current)\b", 2.5),
    s(r"\b(today|yesterday|this week|this month)\b", 3.0),
    s(r"\b(202[4-9]|2030)\b", 2.0),
    s(r"\b(breaking|live|just|now)\b", 3.0),
    s(r"\blast (hour|day|week|month)\b", 2.5),
];

/// Brand and product-category tokens.
pub const BRANDS: &[&str] = &[
    r"\b(apple|iphone|ipad|macbook|airpods?)\b",
    r"\b(samsung|galaxy)\b",
    r"\b(google|pixel)\b",
    r"\b(microsoft|surface|xbox)\b",
    r"\b(sony|playstation)\b",
    r"\b(nvidia|geforce|rtx)\b",
    r"\b(amd|ryzen|radeon)\b",
    r"\b(intel|core i[3579])\b",
    r"\b(dell|hp|lenovo|asus|acer)\b",
    r"\b(lg|tcl|hisense)\b",
    r"\b(laptop|phone|tablet|tv|monitor|headphones?|earbuds?)\b",
    r"\b(camera|lens|drone)\b",
    r"\b(watch|smartwatch|fitbit|garmin)\b",
    r"\b(router|modem|wifi)\b",
    r"\b(keyboard|mouse|gaming)\b",
];

/// Purchase-intent indicators that upgrade a brand match to the full bonus.
pub const PURCHASE_INDICATORS: &[&str] = &[
    r"\b(buy|price|specs?|review|vs|compare)\b",
    r"\b(pro|max|plus|mini|ultra|lite)\b",
    r"\b\d+\s*(gb|tb|inch|mm|hz)\b",
];

pub const EXPLICIT_URL: &str = r"https?://[^\s]+";

pub const BARE_DOMAIN: &str = r"\b(\w+\.(com|org|io|ai|co|dev|net|app))\b";

pub const QUESTION_WORDS: &str = r"\b(what|why|how|when|where|which|who|whose|whom)\b";

pub const CLAUSE_MARKERS: &str = r"\b(and|but|or|because|since|while|although|if|when)\b";
