use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential hashing happens before a user reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 50.0, max = 300.0))]
    pub height_cm: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 1, max = 130))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            height_cm: u.height_cm,
            weight_kg: u.weight_kg,
            age: u.age,
            gender: u.gender,
            fitness_goal: u.fitness_goal,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeightEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::NormalWeight => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

impl Bmi {
    /// Body mass index from height in centimetres and weight in kilograms.
    pub fn from_measurements(height_cm: f64, weight_kg: f64) -> Option<Self> {
        if height_cm <= 0.0 || weight_kg <= 0.0 {
            return None;
        }

        let height_m = height_cm / 100.0;
        let value = weight_kg / (height_m * height_m);
        let category = if value < 18.5 {
            BmiCategory::Underweight
        } else if value < 25.0 {
            BmiCategory::NormalWeight
        } else if value < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        };

        Some(Self { value, category })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub user: UserResponse,
    pub bmi: Option<Bmi>,
    pub weight_history: Vec<WeightEntry>,
}
