// Doctor service - doctor profiles and their weekly availability
use uuid::Uuid;

use crate::db::Repositories;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{
    Availability, CreateAvailability, CreateDoctor, Doctor, NewAvailability, NewDoctor,
    UpdateAvailability, UserRole,
};

pub struct DoctorService {
    repos: Repositories,
}

#[derive(Debug, Clone, Copy)]
pub struct ListDoctorsParams {
    pub page: u32,
    pub limit: u32,
}

impl DoctorService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Create the caller's doctor profile. Only users registered as doctors may have one.
    pub async fn create_profile(&self, current: &CurrentUser, input: CreateDoctor) -> Result<Doctor> {
        let user = self
            .repos
            .users
            .find_by_id(current.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if user.role() != UserRole::Doctor {
            return Err(AppError::Forbidden);
        }

        if self.repos.doctors.find_by_user_id(user.id).await?.is_some() {
            return Err(AppError::BadRequest("Doctor profile already exists".into()));
        }

        let doctor = self.repos.doctors.create(NewDoctor::new(user.id, input)?).await?;
        tracing::info!(doctor_id = %doctor.id, user_id = %user.id, "Doctor profile created");
        Ok(doctor)
    }

    pub async fn get(&self, id: Uuid) -> Result<Doctor> {
        self.repos
            .doctors
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".into()))
    }

    pub async fn list(&self, params: ListDoctorsParams) -> Result<Vec<Doctor>> {
        let offset = (params.page.saturating_sub(1) as i64) * params.limit as i64;
        self.repos.doctors.list(params.limit as i64, offset).await
    }

    pub async fn add_availability(
        &self,
        current: &CurrentUser,
        input: CreateAvailability,
    ) -> Result<Availability> {
        let doctor = self.own_profile(current).await?;
        let slot = self
            .repos
            .availability
            .create(NewAvailability::new(doctor.id, input)?)
            .await?;
        tracing::info!(doctor_id = %doctor.id, slot_id = %slot.id, "Availability added");
        Ok(slot)
    }

    pub async fn availability_for(&self, doctor_id: Uuid) -> Result<Vec<Availability>> {
        let doctor = self.get(doctor_id).await?;
        self.repos.availability.list_for_doctor(doctor.id).await
    }

    /// Only the doctor owning the slot may change it.
    pub async fn update_availability(
        &self,
        current: &CurrentUser,
        slot_id: Uuid,
        update: UpdateAvailability,
    ) -> Result<Availability> {
        let slot = self
            .repos
            .availability
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Availability not found".into()))?;

        let doctor = self.own_profile(current).await?;
        if doctor.id != slot.doctor_id {
            return Err(AppError::Forbidden);
        }

        let slot = slot.apply(update)?;
        self.repos.availability.update(&slot).await
    }

    async fn own_profile(&self, current: &CurrentUser) -> Result<Doctor> {
        self.repos
            .doctors
            .find_by_user_id(current.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor profile not found".into()))
    }
}
