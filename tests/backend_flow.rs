//! End-to-end flow through the backend: register, add a learner, run a
//! month of attendance, export, and tear everything down.

use tempfile::tempdir;
use tutorpay::domain::commands::learner::CreateLearnerCommand;
use tutorpay::domain::commands::payroll::{
    CreateLedgerCommand, DeleteLedgerCommand, SetAttendanceCommand, SetDefaultRateCommand,
};
use tutorpay::domain::commands::user::{LoginCommand, RegisterUserCommand};
use tutorpay::domain::models::payroll::{LedgerKey, Summary};
use tutorpay::Backend;

#[test]
fn full_month_of_tracking() {
    let temp_dir = tempdir().unwrap();
    let backend = Backend::with_base_directory(temp_dir.path()).unwrap();

    backend
        .user_service
        .register(RegisterUserCommand {
            username: "teacher".to_string(),
            fullname: "Cô Lan".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
    assert!(backend
        .user_service
        .login(LoginCommand {
            username: "teacher".to_string(),
            password: "pw".to_string(),
        })
        .unwrap()
        .is_some());

    let learner = backend
        .learner_service
        .create_learner(CreateLearnerCommand {
            username: "teacher".to_string(),
            name: "An".to_string(),
        })
        .unwrap()
        .learner;

    let key = LedgerKey::new("teacher", learner.id, 2, 2024);
    let created = backend
        .payroll_service
        .create_ledger(CreateLedgerCommand { key: key.clone() })
        .unwrap();
    assert_eq!(created.days, 29); // leap February

    for day in [1, 8, 15, 22] {
        backend
            .payroll_service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day,
                attended: true,
            })
            .unwrap();
    }
    backend
        .payroll_service
        .set_default_rate(SetDefaultRateCommand {
            key: key.clone(),
            rate: 150_000,
        })
        .unwrap();
    assert_eq!(
        backend.payroll_service.summary(&key).unwrap(),
        Summary {
            sessions: 4,
            fee: 600_000
        }
    );

    let document = backend.export_service.build_document(&key).unwrap();
    assert_eq!(document.title, "An Tháng 2/2024");
    assert_eq!(document.fee_line, "Tổng phí: 600.000 VNĐ");
    let populated: usize = document.weeks.iter().flatten().flatten().count();
    assert_eq!(populated, 29);

    let listed = backend.payroll_service.list_ledgers("teacher").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].learner_name, "An");

    backend
        .payroll_service
        .delete_ledger(DeleteLedgerCommand { key: key.clone() })
        .unwrap();
    assert_eq!(
        backend.payroll_service.summary(&key).unwrap(),
        Summary::default()
    );
    assert!(backend.payroll_service.list_ledgers("teacher").unwrap().is_empty());
}
