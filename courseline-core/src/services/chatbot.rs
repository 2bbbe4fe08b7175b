//! Chatbot service - the scripted FAQ assistant
//!
//! A rule table evaluated top-to-bottom: each rule is a set of trigger
//! substrings plus a response builder that reads the catalog and enrollment
//! state. The first matching rule answers; a fixed fallback covers the rest.
//! No NLP anywhere, just substring checks against the lowercased input.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{ChatMessage, Course, Enrollment, SessionUser};
use crate::ports::store::keys;
use crate::ports::{StateStore, StateStoreExt};

use super::simulate_latency;

/// The assistant's name, used in greetings and the identity answer
pub const ASSISTANT_NAME: &str = "Edward";

/// Canned prompts offered alongside the input box
pub const QUICK_ACTIONS: &[&str] = &["My Courses", "All Courses", "Categories", "Course Levels"];

const GREETING: &str =
    "Hi there! I'm Edward, your personal learning assistant. How can I help you today?";

#[derive(Debug, Clone, Default, Deserialize)]
struct CoursesDoc {
    #[serde(default)]
    courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EnrollmentsDoc {
    #[serde(default)]
    enrollments: Vec<Enrollment>,
}

/// Everything a response builder may look at
struct ChatContext<'a> {
    query: &'a str,
    courses: &'a [Course],
    enrollments: &'a [Enrollment],
    user: Option<&'a SessionUser>,
}

type ResponseFn = for<'a> fn(&'a ChatContext<'a>) -> String;

/// One entry of the rule table
struct ChatRule {
    triggers: &'static [&'static str],
    build: ResponseFn,
}

impl ChatRule {
    fn matches(&self, query: &str) -> bool {
        self.triggers.iter().any(|t| query.contains(t))
    }
}

/// The ordered rule table. Order matters: earlier rules shadow later ones
/// for overlapping triggers.
static RULES: &[ChatRule] = &[
    ChatRule {
        triggers: &["help", "what can you do", "how to use"],
        build: respond_help,
    },
    ChatRule {
        triggers: &["level", "difficulty", "hard", "easy", "beginner"],
        build: respond_levels,
    },
    ChatRule {
        triggers: &["category", "categories", "subject", "topic", "type"],
        build: respond_categories,
    },
    ChatRule {
        triggers: &["all course", "list", "show courses", "available"],
        build: respond_all_courses,
    },
    ChatRule {
        triggers: &["my course", "my learning", "enrolled", "progress", "i am taking"],
        build: respond_my_courses,
    },
    ChatRule {
        triggers: &["detail", "everything", "summary", "status"],
        build: respond_summary,
    },
    ChatRule {
        triggers: &["hi", "hello", "hey", "edward"],
        build: respond_greeting,
    },
    ChatRule {
        triggers: &["who are you", "your name"],
        build: respond_identity,
    },
];

/// An in-memory transcript. Ids increase monotonically; the greeting is
/// preseeded as message 1.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(1, GREETING)],
            next_id: 2,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_message_id(&self) -> u64 {
        self.messages.last().map(|m| m.id).unwrap_or(0)
    }

    fn push_user(&mut self, text: &str) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage::user(id, text));
        self.messages.last().expect("just pushed")
    }

    fn push_assistant(&mut self, text: String) -> ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        let message = ChatMessage::assistant(id, text);
        self.messages.push(message.clone());
        message
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Chatbot service
pub struct ChatbotService {
    store: Arc<dyn StateStore>,
    session: Arc<dyn StateStore>,
    latency: Duration,
}

impl ChatbotService {
    pub fn new(
        store: Arc<dyn StateStore>,
        session: Arc<dyn StateStore>,
        latency: Duration,
    ) -> Self {
        Self {
            store,
            session,
            latency,
        }
    }

    /// Start a conversation for a user. First contact marks the greeting as
    /// read so a fresh account never starts with an unread badge.
    pub fn start_conversation(&self, user: Option<&SessionUser>) -> Result<Conversation> {
        let conversation = Conversation::new();
        if let Some(user) = user {
            if self.last_read(user.id)?.is_none() {
                self.mark_read(user.id, conversation.last_message_id())?;
            }
        }
        Ok(conversation)
    }

    /// Answer one input, appending both sides to the transcript
    pub fn send(
        &self,
        conversation: &mut Conversation,
        user: Option<&SessionUser>,
        input: &str,
    ) -> Result<ChatMessage> {
        conversation.push_user(input);
        simulate_latency(self.latency);

        let courses = self
            .store
            .load_slice::<CoursesDoc>(keys::COURSES)?
            .unwrap_or_default()
            .courses;
        let enrollments = self
            .store
            .load_slice::<EnrollmentsDoc>(keys::ENROLLMENTS)?
            .unwrap_or_default()
            .enrollments;

        let query = input.to_lowercase();
        let context = ChatContext {
            query: &query,
            courses: &courses,
            enrollments: &enrollments,
            user,
        };

        let text = RULES
            .iter()
            .find(|rule| rule.matches(&query))
            .map(|rule| (rule.build)(&context))
            .unwrap_or_else(|| {
                "I'm not exactly sure about that. Try asking about 'categories', 'levels', \
                 'my courses', or ask for a 'summary'."
                    .to_string()
            });

        Ok(conversation.push_assistant(text))
    }

    // === Unread tracking ===

    /// Last message id the user has seen
    pub fn last_read(&self, user_id: Uuid) -> Result<Option<u64>> {
        self.store.load_wrapped(&keys::chatbot_last_read(user_id))
    }

    /// Persist the last-read marker. Survives sign-out so old messages stay
    /// read across sessions.
    pub fn mark_read(&self, user_id: Uuid, message_id: u64) -> Result<()> {
        self.store
            .save_wrapped(&keys::chatbot_last_read(user_id), &message_id)
    }

    /// True when the newest message is beyond the user's last-read marker
    pub fn has_unread(&self, user_id: Uuid, conversation: &Conversation) -> Result<bool> {
        match self.last_read(user_id)? {
            Some(last_read) => Ok(conversation.last_message_id() > last_read),
            None => Ok(false),
        }
    }

    /// True until the greeting popup has been shown this session
    pub fn greeting_pending(&self, user_id: Uuid) -> Result<bool> {
        let shown: bool = self
            .session
            .load_wrapped(&keys::chatbot_shown(user_id))?
            .unwrap_or(false);
        Ok(!shown)
    }

    /// Record that the greeting popup was shown this session
    pub fn mark_greeting_shown(&self, user_id: Uuid) -> Result<()> {
        self.session
            .save_wrapped(&keys::chatbot_shown(user_id), &true)
    }
}

// === Response builders ===

fn truncate_title(title: &str) -> String {
    if title.chars().count() > 30 {
        let short: String = title.chars().take(30).collect();
        format!("{}...", short)
    } else {
        title.to_string()
    }
}

fn respond_help(_context: &ChatContext) -> String {
    "I am Edward, your learning assistant! I can help you with:\n\n\
     - Finding courses ('list all courses')\n\
     - Course categories ('show categories')\n\
     - Difficulty levels ('what levels?')\n\
     - Your progress ('show my courses')\n\
     - Getting a summary ('give me complete details')"
        .to_string()
}

fn respond_levels(context: &ChatContext) -> String {
    let mut levels: Vec<String> = Vec::new();
    for course in context.courses {
        if course.difficulty.is_empty() {
            continue;
        }
        let mut chars = course.difficulty.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => continue,
        };
        if !levels.contains(&capitalized) {
            levels.push(capitalized);
        }
    }
    if levels.is_empty() {
        "Our courses are designed for all levels, primarily ranging from Beginner to Advanced!"
            .to_string()
    } else {
        format!(
            "We offer courses at these difficulty levels: {}.",
            levels.join(", ")
        )
    }
}

fn respond_categories(context: &ChatContext) -> String {
    let mut categories: Vec<&str> = Vec::new();
    for course in context.courses {
        if !course.category.is_empty() && !categories.contains(&course.category.as_str()) {
            categories.push(&course.category);
        }
    }
    if categories.is_empty() {
        "We have a wide variety of topics! Check the 'All Courses' page for the full list."
            .to_string()
    } else {
        format!(
            "You can choose from these categories: {}.",
            categories.join(", ")
        )
    }
}

fn respond_all_courses(context: &ChatContext) -> String {
    if context.courses.is_empty() {
        return "We're currently updating our catalog. Please check back soon!".to_string();
    }

    // A specific course search: any >3-char word of the query appearing in a title
    let search_terms: Vec<&str> = context
        .query
        .split(' ')
        .filter(|word| word.len() > 3)
        .collect();
    let found = context.courses.iter().find(|c| {
        search_terms
            .iter()
            .any(|term| c.title.to_lowercase().contains(term))
    });
    if let Some(course) = found {
        if !context.query.contains("all") {
            return format!(
                "I found a course called \"{}\". It's in the {} category. Would you like to see more?",
                truncate_title(&course.title),
                course.category
            );
        }
    }

    let listed: Vec<String> = context
        .courses
        .iter()
        .take(5)
        .map(|c| format!("- {}", truncate_title(&c.title)))
        .collect();
    let more = if context.courses.len() > 5 {
        "\n...and more!"
    } else {
        ""
    };
    format!(
        "We have {} courses. Here are some of them:\n{}{}",
        context.courses.len(),
        listed.join("\n"),
        more
    )
}

fn respond_my_courses(context: &ChatContext) -> String {
    let Some(user) = context.user else {
        return "Please log in to your account to view your enrolled courses.".to_string();
    };

    let mine: Vec<&Enrollment> = context
        .enrollments
        .iter()
        .filter(|e| e.user_id == user.id)
        .collect();
    if mine.is_empty() {
        return "You aren't enrolled in any courses yet. Explore our catalog to find something you like!"
            .to_string();
    }
    if context.courses.is_empty() {
        return "We're currently updating our catalog. Please check back soon!".to_string();
    }

    let titles: Vec<String> = context
        .courses
        .iter()
        .filter(|c| mine.iter().any(|e| e.course_id == c.id))
        .map(|c| format!("- {}", truncate_title(&c.title)))
        .collect();
    format!(
        "You are currently enrolled in {} course(s):\n{}\nKeep up the great progress!",
        mine.len(),
        titles.join("\n")
    )
}

fn respond_summary(context: &ChatContext) -> String {
    let mut categories: Vec<&str> = Vec::new();
    let mut levels: Vec<&str> = Vec::new();
    for course in context.courses {
        if !course.category.is_empty() && !categories.contains(&course.category.as_str()) {
            categories.push(&course.category);
        }
        if !course.difficulty.is_empty() && !levels.contains(&course.difficulty.as_str()) {
            levels.push(&course.difficulty);
        }
    }
    let enrollment_line = match context.user {
        Some(user) => context
            .enrollments
            .iter()
            .filter(|e| e.user_id == user.id)
            .count()
            .to_string(),
        None => "Login to see".to_string(),
    };

    format!(
        "*** System Summary ***\n\n\
         Total Courses: {}\n\
         Categories: {}\n\
         Levels: {}\n\
         Your Enrollments: {}",
        context.courses.len(),
        if categories.is_empty() {
            "General".to_string()
        } else {
            categories.join(", ")
        },
        if levels.is_empty() {
            "All skill levels".to_string()
        } else {
            levels.join(", ")
        },
        enrollment_line
    )
}

fn respond_greeting(context: &ChatContext) -> String {
    match context.user {
        Some(user) => format!(
            "Hello {}! I'm {}. How can I assist with your learning journey today?",
            user.name, ASSISTANT_NAME
        ),
        None => format!(
            "Hello! I'm {}. How can I assist with your learning journey today?",
            ASSISTANT_NAME
        ),
    }
}

fn respond_identity(_context: &ChatContext) -> String {
    "I'm Edward, your interactive learning assistant! I was built to help you navigate your \
     courses and find new ones."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::UserCategory;
    use crate::domain::User;
    use serde_json::json;

    fn service_with_catalog() -> (ChatbotService, SessionUser) {
        let store = Arc::new(MemoryStore::new());
        let courses = vec![
            Course::new("Rust Fundamentals Course", "d", "Programming", "Beginner"),
            Course::new("Advanced Systems Design", "d", "Design", "Advanced"),
        ];
        store
            .save(keys::COURSES, &json!({"courses": courses}))
            .unwrap();

        let user = User::new("Ada", "Lovelace", "ada@example.com", "Passw0rd!", UserCategory::Student);
        let session_user = SessionUser::from(&user);
        let enrollment = Enrollment::new(user.id, courses[0].id);
        store
            .save(keys::ENROLLMENTS, &json!({"enrollments": [enrollment]}))
            .unwrap();

        let service = ChatbotService::new(store, Arc::new(MemoryStore::new()), Duration::ZERO);
        (service, session_user)
    }

    #[test]
    fn test_greeting_is_preseeded() {
        let conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);
        assert!(conversation.messages()[0].text.contains("Edward"));
    }

    #[test]
    fn test_categories_rule() {
        let (service, user) = service_with_catalog();
        let mut conversation = Conversation::new();
        let reply = service
            .send(&mut conversation, Some(&user), "show categories please")
            .unwrap();
        assert!(reply.text.contains("Programming"));
        assert!(reply.text.contains("Design"));
    }

    #[test]
    fn test_levels_rule() {
        let (service, user) = service_with_catalog();
        let mut conversation = Conversation::new();
        let reply = service
            .send(&mut conversation, Some(&user), "what difficulty do you offer?")
            .unwrap();
        assert!(reply.text.contains("Beginner"));
        assert!(reply.text.contains("Advanced"));
    }

    #[test]
    fn test_my_courses_requires_login() {
        let (service, _) = service_with_catalog();
        let mut conversation = Conversation::new();
        let reply = service
            .send(&mut conversation, None, "show my courses")
            .unwrap();
        assert!(reply.text.contains("log in"));
    }

    #[test]
    fn test_my_courses_lists_enrollments() {
        let (service, user) = service_with_catalog();
        let mut conversation = Conversation::new();
        let reply = service
            .send(&mut conversation, Some(&user), "my courses")
            .unwrap();
        assert!(reply.text.contains("enrolled in 1 course"));
        assert!(reply.text.contains("Rust Fundamentals Course"));
    }

    #[test]
    fn test_course_search() {
        let (service, user) = service_with_catalog();
        let mut conversation = Conversation::new();
        let reply = service
            .send(&mut conversation, Some(&user), "show courses about rust")
            .unwrap();
        assert!(reply.text.contains("I found a course called"));
    }

    #[test]
    fn test_fallback() {
        let (service, user) = service_with_catalog();
        let mut conversation = Conversation::new();
        let reply = service
            .send(&mut conversation, Some(&user), "qwertyuiop zxcvbnm")
            .unwrap();
        assert!(reply.text.contains("not exactly sure"));
    }

    #[test]
    fn test_rule_order_prefers_earlier_rules() {
        let (service, user) = service_with_catalog();
        let mut conversation = Conversation::new();
        // "help" also contains no other trigger; but a query with both
        // "help" and "category" answers with the help text
        let reply = service
            .send(&mut conversation, Some(&user), "help me with categories")
            .unwrap();
        assert!(reply.text.contains("learning assistant! I can help"));
    }

    #[test]
    fn test_unread_tracking() {
        let (service, user) = service_with_catalog();
        let mut conversation = service.start_conversation(Some(&user)).unwrap();
        // Greeting starts read
        assert!(!service.has_unread(user.id, &conversation).unwrap());

        service.send(&mut conversation, Some(&user), "hello").unwrap();
        assert!(service.has_unread(user.id, &conversation).unwrap());

        service
            .mark_read(user.id, conversation.last_message_id())
            .unwrap();
        assert!(!service.has_unread(user.id, &conversation).unwrap());
    }

    #[test]
    fn test_greeting_shown_once_per_session() {
        let (service, user) = service_with_catalog();
        assert!(service.greeting_pending(user.id).unwrap());
        service.mark_greeting_shown(user.id).unwrap();
        assert!(!service.greeting_pending(user.id).unwrap());
    }
}
