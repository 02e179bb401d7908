pub mod check_verifications;
