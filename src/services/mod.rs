pub mod interview_service;
