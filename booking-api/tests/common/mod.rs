#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use booking_api::config::{Config, DatabaseConfig, JwtConfig, SecurityConfig, ServerConfig};
use booking_api::db::{
    AppointmentRepository, AvailabilityRepository, DoctorRepository, Repositories, UserRepository,
};
use booking_api::error::{AppError, Result};
use booking_api::models::{
    Appointment, Availability, Doctor, NewAppointment, NewAvailability, NewDoctor, NewUserRecord,
    User, UserPatch,
};
use booking_api::security::TEST_HASH_COST;
use booking_api::AppState;

pub const SECRET: &str = "test-secret";

#[derive(Default)]
pub struct MemoryUsers {
    pub rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.rows.lock().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.rows.lock().await.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUserRecord) -> Result<User> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|u| u.email == user.email) {
            return Err(AppError::EmailTaken);
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role.as_str().to_string(),
            phone: user.phone,
            created_at: now,
            updated_at: now,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>> {
        let mut rows = self.rows.lock().await;
        let Some(user) = rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(phone) = patch.phone {
            user.phone = phone;
        }
        if let Some(hash) = patch.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[derive(Default)]
pub struct MemoryDoctors {
    pub rows: Mutex<Vec<Doctor>>,
}

#[async_trait]
impl DoctorRepository for MemoryDoctors {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|d| d.user_id == doctor.user_id) {
            return Err(AppError::BadRequest("Doctor profile already exists".into()));
        }
        let now = Utc::now();
        let created = Doctor {
            id: Uuid::new_v4(),
            user_id: doctor.user_id,
            specialization: doctor.specialization,
            experience: doctor.experience,
            qualifications: doctor.qualifications,
            bio: doctor.bio,
            rating: doctor.rating,
            consultation_fee: doctor.consultation_fee,
            profile_image: doctor.profile_image,
            created_at: now,
            updated_at: now,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>> {
        Ok(self.rows.lock().await.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Doctor>> {
        Ok(self.rows.lock().await.iter().find(|d| d.user_id == user_id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Doctor>> {
        let mut rows = self.rows.lock().await.clone();
        rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryAvailability {
    pub rows: Mutex<Vec<Availability>>,
}

#[async_trait]
impl AvailabilityRepository for MemoryAvailability {
    async fn create(&self, slot: NewAvailability) -> Result<Availability> {
        let now = Utc::now();
        let created = Availability {
            id: Uuid::new_v4(),
            doctor_id: slot.doctor_id,
            day_of_week: slot.day_of_week,
            start_time: slot.start_time,
            end_time: slot.end_time,
            is_available: slot.is_available,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Availability>> {
        Ok(self.rows.lock().await.iter().find(|s| s.id == id).cloned())
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Availability>> {
        let mut slots: Vec<Availability> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|s| s.doctor_id == doctor_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.day_of_week, s.start_time));
        Ok(slots)
    }

    async fn update(&self, slot: &Availability) -> Result<Availability> {
        let mut rows = self.rows.lock().await;
        let stored = rows
            .iter_mut()
            .find(|s| s.id == slot.id)
            .ok_or_else(|| AppError::NotFound("Availability not found".into()))?;
        *stored = Availability { updated_at: Utc::now(), ..slot.clone() };
        Ok(stored.clone())
    }
}

#[derive(Default)]
pub struct MemoryAppointments {
    pub rows: Mutex<Vec<Appointment>>,
}

#[async_trait]
impl AppointmentRepository for MemoryAppointments {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment> {
        let now = Utc::now();
        let created = Appointment {
            id: Uuid::new_v4(),
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            status: appointment.status.as_str().to_string(),
            notes: appointment.notes,
            prescription: None,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.rows.lock().await.iter().find(|a| a.id == id).cloned())
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Appointment>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment> {
        let mut rows = self.rows.lock().await;
        let stored = rows
            .iter_mut()
            .find(|a| a.id == appointment.id)
            .ok_or_else(|| AppError::NotFound("Appointment not found".into()))?;
        *stored = Appointment { updated_at: Utc::now(), ..appointment.clone() };
        Ok(stored.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUsers>,
    pub doctors: Arc<MemoryDoctors>,
    pub appointments: Arc<MemoryAppointments>,
}

pub fn test_config(environment: &str) -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".into(), port: 6000 },
        database: DatabaseConfig {
            url: "postgres://unused".into(),
            max_connections: 1,
        },
        jwt: JwtConfig { secret: SECRET.into(), expiry_hours: 24 },
        security: SecurityConfig { password_hash_cost: TEST_HASH_COST },
        environment: environment.into(),
    }
}

pub fn test_app() -> TestApp {
    test_app_in("development")
}

pub fn test_app_in(environment: &str) -> TestApp {
    let users = Arc::new(MemoryUsers::default());
    let doctors = Arc::new(MemoryDoctors::default());
    let appointments = Arc::new(MemoryAppointments::default());

    let state = AppState {
        repos: Repositories {
            users: users.clone(),
            doctors: doctors.clone(),
            availability: Arc::new(MemoryAvailability::default()),
            appointments: appointments.clone(),
        },
        config: test_config(environment),
    };

    TestApp {
        router: booking_api::app(state),
        users,
        doctors,
        appointments,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sign up and return the `jwtToken=...` pair for later requests
    pub async fn signup(&self, name: &str, email: &str, role: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/signup",
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "Str0ng!Pass",
                    "role": role,
                    "phone": "9876543210",
                })),
                None,
            )
            .await;
        assert_eq!(response.status(), 201, "signup for {} failed", email);
        session_cookie(&response).expect("signup sets the session cookie")
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Full Set-Cookie header for the session cookie, if any
pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("jwtToken="))
        .map(str::to_string)
}

/// The `name=value` part of the session cookie
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    set_cookie_header(response).map(|h| h.split(';').next().unwrap_or_default().to_string())
}
