use std::collections::HashSet;

use super::domain::{Answer, AnswerKind, BranchCondition, ChoiceOption, Question};

/// Ordered, validated set of every question the flow can present.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Validates the definitions and fails fast on any structural problem.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        validate(&questions)?;
        Ok(Self { questions })
    }

    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    pub fn all_questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|question| question.id == id)
    }

    /// Resolves a display label recorded by older clients to its stable option key.
    pub fn option_for_label(&self, question_id: &str, label: &str) -> Option<Answer> {
        let label = label.trim();
        self.question(question_id)?
            .options
            .iter()
            .find(|option| option.label.eq_ignore_ascii_case(label))
            .map(|option| Answer::Choice(option.key.clone()))
    }
}

fn validate(questions: &[Question]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();

    for (index, question) in questions.iter().enumerate() {
        if !seen.insert(question.id.as_str()) {
            return Err(CatalogError::DuplicateQuestion(question.id.clone()));
        }

        match question.kind {
            AnswerKind::SingleChoice => {
                if question.options.is_empty() {
                    return Err(CatalogError::MissingOptions(question.id.clone()));
                }
                let mut keys = HashSet::new();
                for option in &question.options {
                    if option.key.trim().is_empty() || !keys.insert(option.key.as_str()) {
                        return Err(CatalogError::InvalidOptionKey {
                            question: question.id.clone(),
                            key: option.key.clone(),
                        });
                    }
                }
            }
            AnswerKind::RatedScale => {
                if !question.options.is_empty() {
                    return Err(CatalogError::UnexpectedOptions(question.id.clone()));
                }
            }
        }

        if let Some(branch) = &question.branch {
            validate_branch(questions, index, question, branch)?;
        }
    }

    Ok(())
}

fn validate_branch(
    questions: &[Question],
    index: usize,
    question: &Question,
    branch: &BranchCondition,
) -> Result<(), CatalogError> {
    let dependency_index = questions
        .iter()
        .position(|candidate| candidate.id == branch.question)
        .ok_or_else(|| CatalogError::UnknownDependency {
            question: question.id.clone(),
            dependency: branch.question.clone(),
        })?;

    if dependency_index >= index {
        return Err(CatalogError::ForwardDependency {
            question: question.id.clone(),
            dependency: branch.question.clone(),
        });
    }

    if branch.any_of.is_empty() {
        return Err(CatalogError::EmptyBranch(question.id.clone()));
    }

    let dependency = &questions[dependency_index];
    for value in &branch.any_of {
        if dependency.validate(value).is_err() {
            return Err(CatalogError::UnreachableBranchValue {
                question: question.id.clone(),
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("question '{0}' is declared more than once")]
    DuplicateQuestion(String),
    #[error("choice question '{0}' declares no options")]
    MissingOptions(String),
    #[error("scale question '{0}' must not declare options")]
    UnexpectedOptions(String),
    #[error("question '{question}' has a blank or duplicate option key '{key}'")]
    InvalidOptionKey { question: String, key: String },
    #[error("question '{question}' branches on unknown question '{dependency}'")]
    UnknownDependency { question: String, dependency: String },
    #[error("question '{question}' branches on '{dependency}', which is not declared before it")]
    ForwardDependency { question: String, dependency: String },
    #[error("question '{0}' has a branch condition with no accepted answers")]
    EmptyBranch(String),
    #[error("question '{question}' branches on '{value}', which its dependency can never record")]
    UnreachableBranchValue { question: String, value: String },
}

fn choice(
    id: &str,
    prompt: &str,
    category: &str,
    options: &[(&str, &str)],
    branch: Option<BranchCondition>,
) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        kind: AnswerKind::SingleChoice,
        options: options
            .iter()
            .map(|(key, label)| ChoiceOption::new(key, label))
            .collect(),
        category: category.to_string(),
        branch,
    }
}

fn scale(id: &str, prompt: &str, branch: Option<BranchCondition>) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        kind: AnswerKind::RatedScale,
        options: Vec::new(),
        category: "interest".to_string(),
        branch,
    }
}

fn when(question: &str, any_of: Vec<Answer>) -> Option<BranchCondition> {
    Some(BranchCondition {
        question: question.to_string(),
        any_of,
    })
}

fn standard_questions() -> Vec<Question> {
    vec![
        choice(
            "work_environment",
            "What type of work environment do you prefer?",
            "environment",
            &[
                ("people_teams", "Working with people and teams"),
                ("data_analysis", "Working with data and analysis"),
                ("hands_on", "Working with hands-on tasks and things"),
                ("independent_creative", "Working independently and creatively"),
            ],
            None,
        ),
        choice(
            "work_style",
            "Which work style appeals to you most?",
            "style",
            &[
                ("creative_artistic", "Creative and artistic work"),
                ("analytical_problem_solving", "Analytical and problem-solving work"),
                ("structured_organized", "Structured and organized work"),
                ("flexible_varied", "Flexible and varied work"),
            ],
            None,
        ),
        choice(
            "tech_focus",
            "Which kind of analytical work excites you most?",
            "style",
            &[
                ("build_software", "Building apps and software products"),
                ("find_insights", "Finding patterns and insights in data"),
                ("diagnose_problems", "Diagnosing and solving real-world problems"),
            ],
            when(
                "work_style",
                vec![Answer::choice("analytical_problem_solving")],
            ),
        ),
        choice(
            "creative_medium",
            "Which creative medium would you like to work in?",
            "style",
            &[
                ("visual_design", "Visual design, illustration and branding"),
                ("video_storytelling", "Video, storytelling and online content"),
                ("campaigns_copy", "Campaigns, copywriting and social media"),
            ],
            when(
                "work_style",
                vec![
                    Answer::choice("creative_artistic"),
                    Answer::choice("flexible_varied"),
                ],
            ),
        ),
        scale(
            "technology_interest",
            "How interested are you in Technology?",
            None,
        ),
        scale(
            "arts_interest",
            "How interested are you in Arts & Creativity?",
            None,
        ),
        scale(
            "business_interest",
            "How interested are you in Business & Finance?",
            None,
        ),
        scale(
            "numbers_comfort",
            "How comfortable are you working with accounts, taxes and numbers?",
            when("business_interest", vec![Answer::Scale(4), Answer::Scale(5)]),
        ),
        scale(
            "healthcare_interest",
            "How interested are you in Healthcare & Medicine?",
            None,
        ),
        scale(
            "education_interest",
            "How interested are you in Education & Teaching?",
            None,
        ),
        scale(
            "public_service_interest",
            "How interested are you in Public Service & Administration?",
            when("work_environment", vec![Answer::choice("people_teams")]),
        ),
    ]
}
