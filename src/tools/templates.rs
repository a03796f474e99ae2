//! Fixed-template responders: quotes, problem solver, citations and clock

use super::text::{capitalize, RULE};
use chrono::{DateTime, Local};

const QUOTES: &[(&str, &[(&str, &str)])] = &[
    (
        "learning",
        &[
            ("The more that you read, the more things you will know.", "Dr. Seuss"),
            (
                "Education is the most powerful weapon which you can use to change the world.",
                "Nelson Mandela",
            ),
            (
                "Live as if you were to die tomorrow. Learn as if you were to live forever.",
                "Mahatma Gandhi",
            ),
        ],
    ),
    (
        "motivation",
        &[
            ("The only way to do great work is to love what you do.", "Steve Jobs"),
            ("Believe you can and you're halfway there.", "Theodore Roosevelt"),
            (
                "Success is not final, failure is not fatal: it is the courage to continue that counts.",
                "Winston Churchill",
            ),
        ],
    ),
    (
        "success",
        &[
            (
                "Success is not the key to happiness. Happiness is the key to success.",
                "Albert Schweitzer",
            ),
            ("The way to get started is to quit talking and begin doing.", "Walt Disney"),
        ],
    ),
];

/// Quote category for `topic`: the first category that contains the topic
/// or is contained in it (case-insensitive), else `learning`
pub fn quote_category(topic: &str) -> &'static str {
    let topic = topic.to_lowercase();
    QUOTES
        .iter()
        .map(|(category, _)| *category)
        .find(|category| category.contains(topic.as_str()) || topic.contains(category))
        .unwrap_or("learning")
}

/// Up to `num_quotes` quotes on `topic`
pub fn find_quotes(topic: &str, num_quotes: usize) -> String {
    let category = quote_category(topic);
    let quotes = QUOTES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, quotes)| *quotes)
        .unwrap_or_default();

    let mut out = format!(
        "💬 **INSPIRATIONAL QUOTES: {}**\n{}\n\n",
        topic.to_uppercase(),
        RULE
    );
    for (i, (quote, author)) in quotes.iter().take(num_quotes).enumerate() {
        out.push_str(&format!("{}. \"{}\"\n   — {}\n\n", i + 1, quote, author));
    }
    out.push_str(&format!(
        "{RULE}\n\n💡 **Available Categories:**\n• Learning • Motivation • Success • Knowledge • Creativity • Wisdom\n"
    ));
    out
}

/// Four-step problem-solving guide; `math` and `coding` get their own steps
pub fn step_by_step(problem: &str, problem_type: &str) -> String {
    let steps = match problem_type {
        "math" => {
            "**STEP 1: IDENTIFY THE PROBLEM TYPE**
├─ Read the problem carefully
├─ Identify what is given
└─ Determine what needs to be found

**STEP 2: WRITE DOWN KNOWN VALUES**
├─ List all given information
└─ Note any formulas that might apply

**STEP 3: SOLVE STEP-BY-STEP**
├─ Show each calculation clearly
└─ Simplify as you go

**STEP 4: VERIFY YOUR ANSWER**
├─ Check if the answer makes sense
└─ Review all steps for errors
"
        }
        "coding" => {
            "**STEP 1: UNDERSTAND THE REQUIREMENT**
├─ What is the input?
├─ What is the expected output?
└─ What edge cases exist?

**STEP 2: PLAN THE ALGORITHM**
├─ Break problem into smaller functions
└─ Identify data structures needed

**STEP 3: IMPLEMENT THE CODE**
├─ Start with a simple version
└─ Add comments for clarity

**STEP 4: TEST YOUR CODE**
├─ Test with normal cases
└─ Test edge cases
"
        }
        _ => {
            "**STEP 1: UNDERSTAND THE GOAL**
├─ What are you trying to achieve?
└─ What resources do you have?

**STEP 2: CREATE A PLAN**
├─ Break into manageable steps
└─ Prioritize tasks

**STEP 3: EXECUTE SYSTEMATICALLY**
├─ Follow your plan in order
└─ Stay flexible for adjustments

**STEP 4: REVIEW & IMPROVE**
├─ Evaluate the final result
└─ Note areas for improvement
"
        }
    };

    format!(
        "🔍 **STEP-BY-STEP SOLVER**
{RULE}

📝 **PROBLEM:** {problem}
🎯 **TYPE:** {kind}

{RULE}

{steps}
{RULE}

💡 **PRO TIPS:**
• ✅ Take your time on each step
• ✅ Show all your work
• ✅ Double-check calculations/logic

📚 **RESOURCES:**
• For math: Khan Academy, Wolfram Alpha
• For coding: LeetCode, Stack Overflow
",
        kind = problem_type.to_uppercase(),
    )
}

/// Source metadata for a citation
#[derive(Debug, Clone)]
pub struct CitationSource<'a> {
    pub source_type: &'a str,
    pub author: &'a str,
    pub title: &'a str,
    /// Empty means the current year
    pub year: &'a str,
    pub url: &'a str,
}

/// APA, MLA and Chicago renderings of one source, dated `now`
pub fn citation_at(source: &CitationSource<'_>, now: DateTime<Local>) -> String {
    let year = if source.year.is_empty() {
        now.format("%Y").to_string()
    } else {
        source.year.to_string()
    };
    let CitationSource {
        author, title, url, ..
    } = source;

    format!(
        "📚 **CITATION GENERATOR**
{RULE}

**Source Type:** {source_type}

**APA STYLE:**
{author}. ({year}). {title}. Retrieved from {url}

**MLA STYLE:**
{author}. \"{title}.\" {year}. Web. {mla_date}.

**CHICAGO STYLE:**
{author}. \"{title}.\" Accessed {chicago_date}. {url}.

{RULE}

💡 Copy the style required by your institution!
",
        source_type = capitalize(source.source_type),
        mla_date = now.format("%d %b. %Y"),
        chicago_date = now.format("%B %d, %Y"),
    )
}

/// Citation dated today
pub fn citation(source: &CitationSource<'_>) -> String {
    citation_at(source, Local::now())
}

/// Human-readable local date and time
pub fn current_time_at(now: DateTime<Local>) -> String {
    format!(
        "Current Date & Time: {}",
        now.format("%A, %B %d, %Y at %I:%M:%S %p")
    )
}

/// Current local date and time
pub fn current_time() -> String {
    current_time_at(Local::now())
}
