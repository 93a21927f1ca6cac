mod rate_limit;
mod rate_limit_estimator;
mod rate_limit_limiter;
mod rate_limit_rate;
