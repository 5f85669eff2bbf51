// Appointment service - booking and status changes, no scheduling rules
use std::collections::HashSet;

use uuid::Uuid;

use crate::db::Repositories;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Appointment, CreateAppointment, NewAppointment, UpdateAppointment};

pub struct AppointmentService {
    repos: Repositories,
}

impl AppointmentService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Book an appointment for the caller as patient. It starts as Pending.
    pub async fn book(&self, current: &CurrentUser, input: CreateAppointment) -> Result<Appointment> {
        let new_appointment = NewAppointment::new(current.id, input)?;

        if self
            .repos
            .doctors
            .find_by_id(new_appointment.doctor_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Doctor not found".into()));
        }

        let appointment = self.repos.appointments.create(new_appointment).await?;
        tracing::info!(
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            doctor_id = %appointment.doctor_id,
            "Appointment booked"
        );
        Ok(appointment)
    }

    /// Appointments where the caller is the patient or, with a doctor profile, the doctor.
    pub async fn list_for(&self, current: &CurrentUser) -> Result<Vec<Appointment>> {
        let mut appointments = self.repos.appointments.list_for_patient(current.id).await?;

        if let Some(doctor) = self.repos.doctors.find_by_user_id(current.id).await? {
            let seen: HashSet<Uuid> = appointments.iter().map(|a| a.id).collect();
            let as_doctor = self.repos.appointments.list_for_doctor(doctor.id).await?;
            appointments.extend(as_doctor.into_iter().filter(|a| !seen.contains(&a.id)));
        }

        appointments.sort_by_key(|a| (a.appointment_date, a.appointment_time));
        Ok(appointments)
    }

    /// Patient or doctor of the appointment may update it; only the doctor may prescribe.
    pub async fn update(
        &self,
        current: &CurrentUser,
        id: Uuid,
        update: UpdateAppointment,
    ) -> Result<Appointment> {
        let appointment = self
            .repos
            .appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".into()))?;

        let is_patient = appointment.patient_id == current.id;
        let is_doctor = match self.repos.doctors.find_by_user_id(current.id).await? {
            Some(doctor) => doctor.id == appointment.doctor_id,
            None => false,
        };

        if !is_patient && !is_doctor {
            return Err(AppError::Forbidden);
        }
        if update.prescription.is_some() && !is_doctor {
            return Err(AppError::Forbidden);
        }

        let previous = appointment.status();
        let appointment = appointment.apply(update)?;
        let updated = self.repos.appointments.update(&appointment).await?;

        tracing::info!(
            appointment_id = %updated.id,
            from = previous.as_str(),
            to = updated.status().as_str(),
            "Appointment updated"
        );
        Ok(updated)
    }
}
