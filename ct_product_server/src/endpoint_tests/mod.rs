mod helpers;
mod mocks;
mod products;
