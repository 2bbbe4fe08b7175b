//! Static content pages - support, terms of service, privacy policy

use anyhow::Result;
use colored::Colorize;

const TERMS: &[(&str, &str)] = &[
    (
        "1. Acceptance of Terms",
        "By accessing and using Courseline, you accept and agree to be bound by the terms and \
         provision of this agreement.",
    ),
    (
        "2. Use License",
        "Permission is granted to temporarily access the materials on Courseline for personal, \
         non-commercial transitory viewing only.",
    ),
    (
        "3. User Account",
        "You are responsible for maintaining the confidentiality of your account and password. \
         You agree to accept responsibility for all activities that occur under your account.",
    ),
    (
        "4. Course Content",
        "All course materials, including but not limited to text, graphics, logos, images, and \
         software, are the property of Courseline and are protected by copyright laws.",
    ),
    (
        "5. Prohibited Uses",
        "You may not use the service in any way that violates any applicable laws or \
         regulations, or in any manner that could damage, disable, or impair the service.",
    ),
    (
        "6. Limitation of Liability",
        "Courseline shall not be liable for any indirect, incidental, special, consequential, \
         or punitive damages resulting from your use of the service.",
    ),
    (
        "7. Changes to Terms",
        "Courseline reserves the right to modify these terms at any time. Your continued use of \
         the service after any changes constitutes acceptance of the new terms.",
    ),
];

const PRIVACY: &[(&str, &str)] = &[
    (
        "1. Information We Collect",
        "We collect information that you provide directly to us, including your name, email \
         address, password, and any other information you choose to provide when creating an \
         account.",
    ),
    (
        "2. How We Use Your Information",
        "We use the information we collect to provide, maintain, and improve our services, \
         process your transactions, send you technical notices, and respond to your inquiries.",
    ),
    (
        "3. Information Sharing",
        "We do not sell, trade, or rent your personal information to third parties. We may \
         share your information only in the circumstances described in this policy.",
    ),
    (
        "4. Data Security",
        "We implement appropriate security measures to protect your personal information. \
         However, no method of transmission over the Internet is 100% secure.",
    ),
    (
        "5. Your Rights",
        "You have the right to access, update, or delete your personal information at any time \
         through your account settings or by contacting us.",
    ),
    (
        "6. Changes to This Policy",
        "We may update this privacy policy from time to time. We will notify you of any changes \
         by posting the new policy on this page.",
    ),
    (
        "7. Contact Us",
        "If you have any questions about this Privacy Policy, please contact us through our \
         support channels.",
    ),
];

pub fn run_terms() -> Result<()> {
    print_sections("Terms of Service", TERMS);
    Ok(())
}

pub fn run_privacy() -> Result<()> {
    print_sections("Privacy Policy", PRIVACY);
    Ok(())
}

pub fn run_support() -> Result<()> {
    println!("{}", "Help & Support".bold());
    println!();
    println!("{}", "Get Help".bold());
    println!("If you need assistance with Courseline, please contact our support team.");
    println!("  Email Support    support@courseline.dev");
    println!("  Phone Support    1-800-234-5678");
    println!("  Business Hours   Monday - Friday, 9:00 AM - 6:00 PM");
    println!();
    println!("{}", "Common Issues".bold());
    println!("Can't create a course?");
    println!("  Make sure all required fields are filled and the title is between 10-60 characters.");
    println!("Thumbnail not accepted?");
    println!("  Use an external image URL or a data URI (PNG, JPG, GIF).");
    println!();
    println!("{}", "See also: crs faq".dimmed());
    Ok(())
}

fn print_sections(title: &str, sections: &[(&str, &str)]) {
    println!("{}", title.bold());
    println!();
    for (heading, body) in sections {
        println!("{}", heading.bold());
        println!("{}", body);
        println!();
    }
}
