//! A small user list built on `DynArray`.
//!
//! Demonstrates:
//!   1. Creating an array below the capacity floor
//!   2. Pushing heap-allocated records until storage grows
//!   3. Iterating live elements in index order
//!   4. Removing from the middle and taking the record back
//!
//! Run with:
//!   cargo run --example user_list

use dynarr::DynArray;

#[derive(Debug)]
struct User {
    id: u32,
    name: String,
}

fn print_users(list: &DynArray<Box<User>>) {
    for user in list {
        println!("   ID: {} | Name: {}", user.id, user.name);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Generic dynamic array ---");

    let mut list = DynArray::with_capacity(4)?;

    for i in 0..5u32 {
        let user = Box::new(User {
            id: i * 100,
            name: format!("User_{i}"),
        });
        list.push(user)?;
    }
    println!(
        ">> Current list ({} users, capacity {}):",
        list.len(),
        list.capacity()
    );
    print_users(&list);

    println!("\n>> Deleting index 2...");
    if let Some(removed) = list.remove(2) {
        println!("   Removed: {}", removed.name);
    }
    print_users(&list);

    println!("\n>> Cleaning up...");
    let stats = list.stats();
    println!(
        "   {} grows, {} shrinks over the list's lifetime",
        stats.grows, stats.shrinks
    );
    drop(list);

    Ok(())
}
