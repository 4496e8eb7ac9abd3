#[tokio::main]
async fn main() {
    if let Err(e) = doctor_admin_lib::run().await {
        eprintln!("doctor-admin: {e}");
        std::process::exit(1);
    }
}
