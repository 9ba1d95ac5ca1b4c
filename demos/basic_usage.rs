use classified_errors::{
    ClassifiedError, Result, code_of, data_as, define_error_codes, is_classified_as, render_error,
};

define_error_codes! {
    NOT_FOUND = "not_found",
    INVALID_INPUT = "invalid_input",
}

fn find_user(id: u32) -> Result<String> {
    // Simulate a lookup that misses
    if id == 42 {
        return Err(ClassifiedError::new_with_data(
            NOT_FOUND,
            None,
            format!("user {id} missing"),
            id,
        ));
    }
    Ok(format!("user-{id}"))
}

fn load_profile(id: u32) -> Result<String> {
    find_user(id).map_err(|e| ClassifiedError::wrap(e, "failed to load profile"))
}

fn main() {
    println!("--- Basic Usage Example ---\n");

    match load_profile(42) {
        Ok(profile) => println!("Loaded {profile}"),
        Err(err) => {
            // 1. Branch on the classification, never on text
            println!("1. [CLASSIFICATION]");
            println!("   code:          {}", code_of(&err));
            println!("   is not_found:  {}", is_classified_as(&err, &NOT_FOUND));
            println!("   is invalid:    {}", is_classified_as(&err, &INVALID_INPUT));

            // 2. What a caller that only knows std::error::Error sees
            println!("\n2. [DISPLAY]");
            println!("   {err}");

            // 3. The payload travels with the error that attached it
            println!("\n3. [DATA]");
            let root = err
                .cause()
                .and_then(|c| c.downcast_ref::<ClassifiedError>());
            if let Some(root) = root {
                println!("   user id: {:?}", data_as::<u32>(root));
            }

            // 4. Full diagnostic for the operator
            println!("\n4. [RENDERED]");
            println!("   {}", render_error(&err));
        }
    }
}
