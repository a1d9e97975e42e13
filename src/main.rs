use rocket::{Build, Rocket};
use toolshelf::Config;

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let config = Config::load().expect("Failed to load configuration");

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()));

    toolshelf::build_rocket(config).configure(rocket::Config::from(figment))
}
